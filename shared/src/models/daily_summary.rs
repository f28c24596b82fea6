//! Daily Sales Summary Model

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::Order;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::money;

/// Aggregated sales line (one per item name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub name: String,
    pub quantity: u32,
    pub amount: f64,
}

/// Submitted daily summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub branch_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<SummaryLine>,
    pub total: f64,
    pub cash: f64,
    pub gcash: f64,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Submit daily summary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryCreate {
    pub branch_id: String,
    pub date: NaiveDate,
    pub items: Vec<SummaryLine>,
    pub cash: f64,
    pub gcash: f64,
}

impl DailySummaryCreate {
    /// Build a summary draft for `date` from that day's orders
    ///
    /// `orders` are the ones the server returned for the business day; their
    /// UTC timestamps may fall on the previous calendar date in the shop's
    /// local time, so they are not re-filtered by date here. Unpaid orders
    /// are skipped. Lines are merged by item name and sorted by name. Cash
    /// and GCash start at the split recorded on each order's payment method.
    pub fn from_orders(branch_id: impl Into<String>, date: NaiveDate, orders: &[Order]) -> Self {
        let mut lines: BTreeMap<&str, (u32, Decimal)> = BTreeMap::new();
        let mut cash = Decimal::ZERO;
        let mut gcash = Decimal::ZERO;

        for order in orders.iter().filter(|o| o.is_paid()) {
            let mut order_total = Decimal::ZERO;
            for item in &order.items {
                let entry = lines.entry(item.name.as_str()).or_default();
                entry.0 += item.quantity;
                entry.1 += item.line_total();
                order_total += item.line_total();
            }
            match order.payment_method {
                Some(super::PaymentMethod::Gcash) => gcash += order_total,
                _ => cash += order_total,
            }
        }

        Self {
            branch_id: branch_id.into(),
            date,
            items: lines
                .into_iter()
                .map(|(name, (quantity, amount))| SummaryLine {
                    name: name.to_string(),
                    quantity,
                    amount: money::to_f64(amount),
                })
                .collect(),
            cash: money::to_f64(cash),
            gcash: money::to_f64(gcash),
        }
    }

    /// Sum of all line amounts
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|l| money::to_decimal(l.amount)).sum()
    }

    /// Cash plus GCash must equal the items total
    pub fn validate(&self) -> AppResult<()> {
        super::require_text(&self.branch_id, "branchId")?;
        money::require_non_negative(self.cash, "cash")?;
        money::require_non_negative(self.gcash, "gcash")?;

        let total = self.total();
        let paid = money::to_decimal(self.cash) + money::to_decimal(self.gcash);
        if !money::amounts_match(total, paid) {
            return Err(AppError::new(ErrorCode::PaymentSplitMismatch)
                .with_detail("total", money::to_f64(total))
                .with_detail("paid", money::to_f64(paid)));
        }
        Ok(())
    }
}
