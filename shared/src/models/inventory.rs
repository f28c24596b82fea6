//! Inventory Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::money;

/// Default low-stock threshold when none is configured
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 5.0;

fn default_threshold() -> f64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// Inventory item (ingredient or supply)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub quantity: f64,
    /// Unit of measure (e.g. "kg", "pcs")
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: f64,
    #[serde(default)]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }

    /// Quantity after applying `delta`, refusing to go negative
    pub fn adjusted_quantity(&self, delta: f64) -> AppResult<f64> {
        let next = money::to_decimal(self.quantity) + money::to_decimal(delta);
        if next.is_sign_negative() && !next.is_zero() {
            return Err(AppError::new(ErrorCode::InsufficientStock)
                .with_detail("item", self.name.clone())
                .with_detail("available", self.quantity));
        }
        Ok(money::to_f64(next))
    }
}

/// Create inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCreate {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub low_stock_threshold: Option<f64>,
    pub branch_id: String,
}

impl InventoryCreate {
    pub fn validate(&self) -> AppResult<()> {
        super::require_text(&self.name, "name")?;
        super::require_text(&self.branch_id, "branchId")?;
        money::require_non_negative(self.quantity, "quantity")
    }
}

/// Stock adjustment payload (positive restocks, negative consumes)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub delta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
