//! Customer Photo Model (landing page gallery)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Customer photo entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPhoto {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Uploaded image reference
    pub image_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub is_active: bool,
    /// 1-based position among displayed photos
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create photo payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPhotoCreate {
    pub image_url: String,
    pub alt_text: String,
    pub is_active: bool,
    pub display_order: u32,
}

impl CustomerPhotoCreate {
    pub fn validate(&self) -> AppResult<()> {
        super::require_text(&self.image_url, "imageUrl")
    }
}

/// Update photo payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPhotoUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// One entry of a batched reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoOrderEntry {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub display_order: u32,
}

/// Batched reorder request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoReorder {
    pub photos: Vec<PhotoOrderEntry>,
}
