//! Menu Item Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::money;

use super::order::ItemType;

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Category reference
    #[serde(alias = "category")]
    pub category_id: Option<String>,
    /// Uploaded image reference, see [`super::upload::resolve_image_url`]
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default)]
    pub item_type: ItemType,
    /// Owner attribution (user id of the creator)
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub category_id: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default)]
    pub item_type: ItemType,
}

impl MenuItemCreate {
    pub fn validate(&self) -> AppResult<()> {
        super::require_text(&self.name, "name")?;
        money::require_positive(self.price, "price")
    }
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_best_seller: Option<bool>,
}

impl MenuItemUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            super::require_text(name, "name")?;
        }
        if let Some(price) = self.price {
            money::require_positive(price, "price")?;
        }
        Ok(())
    }
}
