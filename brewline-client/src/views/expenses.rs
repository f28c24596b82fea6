//! Expenses view - withdrawals and purchases of the selected branch
//!
//! Totals are computed over the filtered records, so the split shown always
//! matches the rows on screen.

use std::sync::{Arc, Mutex};

use shared::ledger::{self, SplitTotals};
use shared::models::{Capability, Withdrawal, WithdrawalCreate, WithdrawalFilter};

use super::sequencer::RequestSequencer;
use crate::ClientResult;
use crate::api::WithdrawalApi;
use crate::session::Session;

#[derive(Debug, Default)]
struct ExpensesState {
    records: Vec<Withdrawal>,
    filter: WithdrawalFilter,
}

pub struct ExpensesView {
    session: Arc<Session>,
    api: Arc<dyn WithdrawalApi>,
    state: Mutex<ExpensesState>,
    sequencer: RequestSequencer,
}

impl ExpensesView {
    pub fn new(session: Arc<Session>, api: Arc<dyn WithdrawalApi>) -> Self {
        Self {
            session,
            api,
            state: Mutex::new(ExpensesState::default()),
            sequencer: RequestSequencer::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ExpensesState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch the records of the selected branch, newest first
    pub async fn refresh(&self) -> ClientResult<()> {
        self.session.require(Capability::ManageExpenses)?;
        let branch = self.session.require_branch()?;
        let ticket = self.sequencer.issue();
        let mut records = self.api.list(&branch).await?;
        if !self.sequencer.is_current(ticket) {
            tracing::debug!(branch = %branch, "Dropping superseded expenses fetch");
            return Ok(());
        }
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.lock().records = records;
        Ok(())
    }

    pub fn set_filter(&self, filter: WithdrawalFilter) {
        self.lock().filter = filter;
    }

    pub fn filter(&self) -> WithdrawalFilter {
        self.lock().filter.clone()
    }

    /// Records passing the current filter
    pub fn filtered(&self) -> Vec<Withdrawal> {
        let state = self.lock();
        state
            .filter
            .apply(&state.records)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Split totals over the filtered records
    pub fn totals(&self) -> SplitTotals {
        let state = self.lock();
        ledger::split_totals(state.filter.apply(&state.records))
    }

    pub async fn create(&self, withdrawal: WithdrawalCreate) -> ClientResult<Withdrawal> {
        self.session.require(Capability::ManageExpenses)?;
        let created = self.api.create(&withdrawal).await?;
        tracing::info!(withdrawal_id = %created.id, amount = created.amount, "Expense recorded");
        self.lock().records.insert(0, created.clone());
        Ok(created)
    }

    pub async fn delete(&self, withdrawal_id: &str) -> ClientResult<()> {
        self.session.require(Capability::ManageExpenses)?;
        self.api.delete(withdrawal_id).await?;
        self.lock().records.retain(|r| r.id != withdrawal_id);
        Ok(())
    }
}
