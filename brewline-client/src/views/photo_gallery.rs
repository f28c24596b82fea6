//! Customer photo admin - optimistic reorder and capacity-gated activation
//!
//! Reordering publishes the new positions immediately and sends one batched
//! update. Success keeps the local order; failure discards it and re-fetches.
//! Activation is refused locally once six photos are active.

use std::sync::{Arc, Mutex};

use shared::gallery;
use shared::models::{Capability, CustomerPhoto, CustomerPhotoCreate, CustomerPhotoUpdate};
use shared::reconcile::{LocalState, ServerOutcome, apply};

use super::sequencer::RequestSequencer;
use crate::api::PhotoApi;
use crate::session::Session;
use crate::{ClientError, ClientResult};

pub struct PhotoGallery {
    session: Arc<Session>,
    api: Arc<dyn PhotoApi>,
    state: Mutex<LocalState<Vec<CustomerPhoto>>>,
    sequencer: RequestSequencer,
}

impl PhotoGallery {
    pub fn new(session: Arc<Session>, api: Arc<dyn PhotoApi>) -> Self {
        Self {
            session,
            api,
            state: Mutex::new(LocalState::new(Vec::new())),
            sequencer: RequestSequencer::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LocalState<Vec<CustomerPhoto>>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the local state with the result of `f`
    fn transition(&self, f: impl FnOnce(LocalState<Vec<CustomerPhoto>>) -> LocalState<Vec<CustomerPhoto>>) {
        let mut state = self.lock();
        let current = std::mem::replace(&mut *state, LocalState::new(Vec::new()));
        *state = f(current);
    }

    /// Fetch the canonical list
    pub async fn refresh(&self) -> ClientResult<()> {
        let ticket = self.sequencer.issue();
        let mut photos = self.api.list().await?;
        if !self.sequencer.is_current(ticket) {
            return Ok(());
        }
        gallery::sort_for_display(&mut photos);
        self.transition(|state| apply(state, ServerOutcome::Fetched(photos)));
        Ok(())
    }

    /// Photos as displayed (optimistic order while a reorder is in flight)
    pub fn photos(&self) -> Vec<CustomerPhoto> {
        self.lock().visible().clone()
    }

    pub fn active_photos(&self) -> Vec<CustomerPhoto> {
        self.photos().into_iter().filter(|p| p.is_active).collect()
    }

    /// A failed write left the list possibly out of date
    pub fn needs_refetch(&self) -> bool {
        self.lock().needs_refetch
    }

    /// Move the photo at `from` to `to`
    ///
    /// On failure the optimistic order is dropped and the canonical order is
    /// re-fetched; the original error is returned either way.
    pub async fn move_photo(&self, from: usize, to: usize) -> ClientResult<()> {
        self.session.require(Capability::ManagePhotos)?;

        let moved = gallery::move_item(&self.photos(), from, to);
        let entries = gallery::reorder_entries(&moved);
        self.transition(|state| state.propose(moved));

        match self.api.reorder(&entries).await {
            Ok(()) => {
                self.transition(|state| apply(state, ServerOutcome::Confirmed(None)));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Photo reorder failed, re-fetching: {e}");
                self.transition(|state| apply(state, ServerOutcome::Rejected));
                if let Err(refetch) = self.refresh().await {
                    tracing::warn!("Re-fetch after failed reorder also failed: {refetch}");
                }
                Err(e)
            }
        }
    }

    /// Apply `f` to the confirmed list and re-sort
    fn commit(&self, f: impl FnOnce(&mut Vec<CustomerPhoto>)) {
        let mut state = self.lock();
        f(&mut state.confirmed);
        gallery::sort_for_display(&mut state.confirmed);
    }

    fn replace(&self, photo: CustomerPhoto) {
        self.commit(|photos| match photos.iter_mut().find(|p| p.id == photo.id) {
            Some(slot) => *slot = photo,
            None => photos.push(photo),
        });
    }

    /// Create a photo; an active one is capacity-gated
    pub async fn create(&self, mut photo: CustomerPhotoCreate) -> ClientResult<CustomerPhoto> {
        self.session.require(Capability::ManagePhotos)?;
        let current = self.photos();
        if photo.is_active {
            gallery::ensure_capacity(&current, None)?;
        }
        if photo.display_order == 0 {
            photo.display_order = gallery::next_display_order(&current);
        }
        let created = self.api.create(&photo).await?;
        self.replace(created.clone());
        Ok(created)
    }

    /// Update a photo; setting it active is capacity-gated
    pub async fn update(
        &self,
        photo_id: &str,
        update: CustomerPhotoUpdate,
    ) -> ClientResult<CustomerPhoto> {
        self.session.require(Capability::ManagePhotos)?;
        if update.is_active == Some(true) {
            gallery::check_activation(&self.photos(), photo_id, true)?;
        }
        let updated = self.api.update(photo_id, &update).await?;
        self.replace(updated.clone());
        Ok(updated)
    }

    /// Flip a photo's active flag
    pub async fn toggle(&self, photo_id: &str) -> ClientResult<CustomerPhoto> {
        self.session.require(Capability::ManagePhotos)?;
        let photos = self.photos();
        let photo = photos
            .iter()
            .find(|p| p.id == photo_id)
            .ok_or_else(|| ClientError::NotFound(format!("Photo {photo_id}")))?;
        let activate = !photo.is_active;
        gallery::check_activation(&photos, photo_id, activate)?;

        let toggled = self.api.toggle(photo_id, activate).await?;
        self.replace(toggled.clone());
        Ok(toggled)
    }

    pub async fn delete(&self, photo_id: &str) -> ClientResult<()> {
        self.session.require(Capability::ManagePhotos)?;
        self.api.delete(photo_id).await?;
        self.commit(|photos| photos.retain(|p| p.id != photo_id));
        Ok(())
    }
}
