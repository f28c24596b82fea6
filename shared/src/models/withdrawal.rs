//! Withdrawal / Purchase Model (expense tracking)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::money;

/// Expense record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    Withdrawal,
    Purchase,
}

/// Who an expense is charged to
///
/// The shop is co-owned by two partners; `All` splits the amount evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargedTo {
    John,
    Elwin,
    All,
}

/// Withdrawal or purchase record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ExpenseType,
    pub amount: f64,
    pub description: String,
    pub charged_to: ChargedTo,
    #[serde(default)]
    pub branch_id: Option<String>,
    /// User who recorded the expense
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create withdrawal payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalCreate {
    #[serde(rename = "type")]
    pub kind: ExpenseType,
    pub amount: f64,
    pub description: String,
    pub charged_to: ChargedTo,
    pub branch_id: String,
}

impl WithdrawalCreate {
    pub fn validate(&self) -> AppResult<()> {
        money::require_positive(self.amount, "amount")?;
        super::require_text(&self.description, "description")?;
        super::require_text(&self.branch_id, "branchId")
    }
}

/// Client-side filter over fetched expense records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawalFilter {
    pub kind: Option<ExpenseType>,
    pub charged_to: Option<ChargedTo>,
    /// Inclusive start date (UTC)
    pub from: Option<NaiveDate>,
    /// Inclusive end date (UTC)
    pub to: Option<NaiveDate>,
}

impl WithdrawalFilter {
    pub fn matches(&self, record: &Withdrawal) -> bool {
        let day = record.created_at.date_naive();
        self.kind.is_none_or(|k| k == record.kind)
            && self.charged_to.is_none_or(|c| c == record.charged_to)
            && self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
    }

    /// Borrowing view of the matching records, source order preserved
    pub fn apply<'a>(&self, records: &'a [Withdrawal]) -> Vec<&'a Withdrawal> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
