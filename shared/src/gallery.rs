//! Customer photo ordering and the active-photo cap
//!
//! The landing page shows at most [`MAX_ACTIVE_PHOTOS`] active photos. The cap
//! is checked client-side before every activation and is advisory only: two
//! admins racing can still exceed it.

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{CustomerPhoto, PhotoOrderEntry};

/// Maximum active photos on the landing page
pub const MAX_ACTIVE_PHOTOS: usize = 6;

/// Sort photos for display: by display order, ties broken by id
pub fn sort_for_display(photos: &mut [CustomerPhoto]) {
    photos.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Move the photo at `from` to `to` and renumber display orders 1..=N
///
/// Indices are clamped to the list. The result is a permutation of the input.
pub fn move_item(photos: &[CustomerPhoto], from: usize, to: usize) -> Vec<CustomerPhoto> {
    let mut next = photos.to_vec();
    if !next.is_empty() {
        let last = next.len() - 1;
        let item = next.remove(from.min(last));
        next.insert(to.min(last), item);
    }
    for (index, photo) in next.iter_mut().enumerate() {
        photo.display_order = index as u32 + 1;
    }
    next
}

/// Entries for the batched reorder request
pub fn reorder_entries(photos: &[CustomerPhoto]) -> Vec<PhotoOrderEntry> {
    photos
        .iter()
        .map(|p| PhotoOrderEntry {
            id: p.id.clone(),
            display_order: p.display_order,
        })
        .collect()
}

/// Active photos, excluding the record being edited
pub fn active_count(photos: &[CustomerPhoto], excluding: Option<&str>) -> usize {
    photos
        .iter()
        .filter(|p| p.is_active && Some(p.id.as_str()) != excluding)
        .count()
}

/// Refuse to activate one more photo once the cap is reached
///
/// `editing` is the id of the record being activated (none when creating).
pub fn ensure_capacity(photos: &[CustomerPhoto], editing: Option<&str>) -> AppResult<()> {
    let active = active_count(photos, editing);
    if active + 1 > MAX_ACTIVE_PHOTOS {
        return Err(AppError::new(ErrorCode::ActivePhotoLimit)
            .with_detail("active", active)
            .with_detail("max", MAX_ACTIVE_PHOTOS));
    }
    Ok(())
}

/// Check a toggle: deactivation always passes, activation is capacity-gated
pub fn check_activation(photos: &[CustomerPhoto], id: &str, activate: bool) -> AppResult<()> {
    if !activate {
        return Ok(());
    }
    ensure_capacity(photos, Some(id))
}

/// Next display order for a new photo
pub fn next_display_order(photos: &[CustomerPhoto]) -> u32 {
    photos.iter().map(|p| p.display_order).max().unwrap_or(0) + 1
}
