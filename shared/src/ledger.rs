//! Expense split accounting
//!
//! Folds a list of withdrawals/purchases into totals by type and by payer.
//! A record charged to `all` contributes half its amount to each of the two
//! payers. Shares stay unrounded so that `john + elwin == total` always holds.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ChargedTo, ExpenseType, Withdrawal};
use crate::money;

/// Aggregated expense totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitTotals {
    pub withdrawals: Decimal,
    pub purchases: Decimal,
    pub john: Decimal,
    pub elwin: Decimal,
    pub total: Decimal,
    pub count: usize,
}

impl SplitTotals {
    /// Accumulate one record
    pub fn add(mut self, record: &Withdrawal) -> Self {
        let amount = money::to_decimal(record.amount);

        match record.kind {
            ExpenseType::Withdrawal => self.withdrawals += amount,
            ExpenseType::Purchase => self.purchases += amount,
        }

        match record.charged_to {
            ChargedTo::John => self.john += amount,
            ChargedTo::Elwin => self.elwin += amount,
            ChargedTo::All => {
                let half = amount / Decimal::TWO;
                self.john += half;
                self.elwin += amount - half;
            }
        }

        self.total += amount;
        self.count += 1;
        self
    }

    /// Share charged to one payer; `All` returns the grand total
    pub fn share(&self, payer: ChargedTo) -> Decimal {
        match payer {
            ChargedTo::John => self.john,
            ChargedTo::Elwin => self.elwin,
            ChargedTo::All => self.total,
        }
    }

    /// Display value (rounded to centavos)
    pub fn display(value: Decimal) -> f64 {
        money::to_f64(value)
    }
}

/// Fold records into [`SplitTotals`]
pub fn split_totals<'a, I>(records: I) -> SplitTotals
where
    I: IntoIterator<Item = &'a Withdrawal>,
{
    records.into_iter().fold(SplitTotals::default(), SplitTotals::add)
}
