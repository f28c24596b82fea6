//! Per-resource API facades
//!
//! Each resource is a trait (so view models can run against in-memory fakes)
//! plus an implementation backed by [`HttpClient`]. Client-side validation
//! runs before anything is sent and surfaces as [`ClientError::Validation`].
//!
//! [`ClientError::Validation`]: crate::ClientError::Validation

pub mod auth;
pub mod dtr;
pub mod inventory;
pub mod menu;
pub mod orders;
pub mod photos;
pub mod summaries;
pub mod upload;
pub mod withdrawals;

use std::sync::Arc;

pub use auth::{AuthApi, AuthClient};
pub use dtr::{DtrApi, DtrClient};
pub use inventory::{InventoryApi, InventoryClient};
pub use menu::{MenuApi, MenuClient, MenuQuery};
pub use orders::{OrderApi, OrderQuery, OrdersClient};
pub use photos::{PhotoApi, PhotosClient};
pub use summaries::{SummariesClient, SummaryApi};
pub use upload::{UploadApi, UploadClient};
pub use withdrawals::{WithdrawalApi, WithdrawalsClient};

use crate::HttpClient;

/// Query parameter carrying the branch scope
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BranchQuery<'a> {
    pub branch_id: &'a str,
}

/// All facades over one shared HTTP client
#[derive(Clone)]
pub struct Api {
    pub http: HttpClient,
    pub auth: Arc<dyn AuthApi>,
    pub orders: Arc<dyn OrderApi>,
    pub menu: Arc<dyn MenuApi>,
    pub withdrawals: Arc<dyn WithdrawalApi>,
    pub inventory: Arc<dyn InventoryApi>,
    pub summaries: Arc<dyn SummaryApi>,
    pub dtr: Arc<dyn DtrApi>,
    pub photos: Arc<dyn PhotoApi>,
    pub upload: Arc<dyn UploadApi>,
}

impl Api {
    pub fn new(http: HttpClient) -> Self {
        Self {
            auth: Arc::new(AuthClient::new(http.clone())),
            orders: Arc::new(OrdersClient::new(http.clone())),
            menu: Arc::new(MenuClient::new(http.clone())),
            withdrawals: Arc::new(WithdrawalsClient::new(http.clone())),
            inventory: Arc::new(InventoryClient::new(http.clone())),
            summaries: Arc::new(SummariesClient::new(http.clone())),
            dtr: Arc::new(DtrClient::new(http.clone())),
            photos: Arc::new(PhotosClient::new(http.clone())),
            upload: Arc::new(UploadClient::new(http.clone())),
            http,
        }
    }
}

impl std::fmt::Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Api")
            .field("base_url", &self.http.base_url())
            .finish_non_exhaustive()
    }
}
