//! Customer photos API
//!
//! The active-photo cap is enforced by the view model before calling
//! `create`/`toggle`; a server-side rejection surfaces as a normal API error.

use async_trait::async_trait;
use serde::Serialize;
use shared::client::MessageResponse;
use shared::models::{
    CustomerPhoto, CustomerPhotoCreate, CustomerPhotoUpdate, PhotoOrderEntry, PhotoReorder,
};
use urlencoding::encode;

use crate::{ClientResult, HttpClient};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToggleBody {
    is_active: bool,
}

#[async_trait]
pub trait PhotoApi: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<CustomerPhoto>>;
    async fn create(&self, photo: &CustomerPhotoCreate) -> ClientResult<CustomerPhoto>;
    async fn update(&self, photo_id: &str, update: &CustomerPhotoUpdate)
    -> ClientResult<CustomerPhoto>;
    async fn toggle(&self, photo_id: &str, active: bool) -> ClientResult<CustomerPhoto>;
    /// Batched reorder; all-or-nothing on the server
    async fn reorder(&self, entries: &[PhotoOrderEntry]) -> ClientResult<()>;
    async fn delete(&self, photo_id: &str) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct PhotosClient {
    http: HttpClient,
}

impl PhotosClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PhotoApi for PhotosClient {
    async fn list(&self) -> ClientResult<Vec<CustomerPhoto>> {
        self.http.get("/api/customer-photos").await
    }

    async fn create(&self, photo: &CustomerPhotoCreate) -> ClientResult<CustomerPhoto> {
        photo.validate()?;
        self.http.post("/api/customer-photos", photo).await
    }

    async fn update(
        &self,
        photo_id: &str,
        update: &CustomerPhotoUpdate,
    ) -> ClientResult<CustomerPhoto> {
        self.http
            .put(&format!("/api/customer-photos/{}", encode(photo_id)), update)
            .await
    }

    async fn toggle(&self, photo_id: &str, active: bool) -> ClientResult<CustomerPhoto> {
        self.http
            .patch(
                &format!("/api/customer-photos/{}/toggle", encode(photo_id)),
                &ToggleBody { is_active: active },
            )
            .await
    }

    async fn reorder(&self, entries: &[PhotoOrderEntry]) -> ClientResult<()> {
        let body = PhotoReorder {
            photos: entries.to_vec(),
        };
        self.http
            .put::<Option<MessageResponse>, _>("/api/customer-photos/reorder", &body)
            .await
            .map(|_| ())
    }

    async fn delete(&self, photo_id: &str) -> ClientResult<()> {
        self.http
            .delete::<Option<MessageResponse>>(&format!("/api/customer-photos/{}", encode(photo_id)))
            .await
            .map(|_| ())
    }
}
