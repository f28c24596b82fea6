//! Order board - branch-scoped order list shared by the order taker and the
//! kitchen display
//!
//! Holds a versioned cache of the selected branch's orders, fed by fetches
//! and realtime events. Item status changes are optimistic: the local copy
//! changes first and is restored if the server rejects the update.

use std::sync::{Arc, Mutex};

use shared::message::OrderEvent;
use shared::models::{
    Capability, ItemStatus, Order, OrderAppend, OrderCreate, OrderItem, PaymentMethod,
};
use shared::reconcile::{self, EventOutcome, VersionedStore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::sequencer::RequestSequencer;
use crate::api::{OrderApi, OrderQuery};
use crate::realtime::Subscription;
use crate::session::Session;
use crate::{ClientError, ClientResult};

/// One item on the kitchen display
#[derive(Debug, Clone, PartialEq)]
pub struct KitchenTicket {
    pub order_id: String,
    pub customer_name: String,
    pub item: OrderItem,
}

#[derive(Debug, Default)]
struct BoardState {
    /// Branch the cached orders belong to
    branch: Option<String>,
    orders: VersionedStore<Order>,
}

pub struct OrderBoard {
    session: Arc<Session>,
    api: Arc<dyn OrderApi>,
    state: Mutex<BoardState>,
    sequencer: RequestSequencer,
}

impl OrderBoard {
    pub fn new(session: Arc<Session>, api: Arc<dyn OrderApi>) -> Self {
        Self {
            session,
            api,
            state: Mutex::new(BoardState::default()),
            sequencer: RequestSequencer::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Lock the cache, clearing it if the selected branch changed
    fn lock_for(&self, branch: &str) -> std::sync::MutexGuard<'_, BoardState> {
        let mut state = self.lock();
        if state.branch.as_deref() != Some(branch) {
            tracing::debug!(branch, "Order board switched branch");
            state.orders.clear();
            state.branch = Some(branch.to_string());
        }
        state
    }

    /// Fetch the selected branch's orders
    ///
    /// Only the latest issued refresh is applied; an older one resolving
    /// late is discarded.
    pub async fn refresh(&self) -> ClientResult<()> {
        let branch = self.session.require_branch()?;
        let ticket = self.sequencer.issue();
        let since = self.lock_for(&branch).orders.mark();
        let orders = self.api.list(&OrderQuery::branch(&branch)).await?;

        if !self.sequencer.is_current(ticket) || self.session.branch().as_deref() != Some(branch.as_str()) {
            tracing::debug!(branch = %branch, "Discarding superseded order fetch");
            return Ok(());
        }
        let count = orders.len();
        self.lock_for(&branch).orders.merge_snapshot(orders, since);
        tracing::debug!(branch = %branch, count, "Order board refreshed");
        Ok(())
    }

    /// Apply one realtime event
    pub fn apply_event(&self, event: OrderEvent) -> EventOutcome {
        let Some(branch) = self.session.branch() else {
            return EventOutcome::OtherBranch;
        };
        let order_id = event.order_id().to_string();
        let outcome = reconcile::apply_event(&mut self.lock_for(&branch).orders, event, &branch);
        tracing::trace!(order_id = %order_id, ?outcome, "Realtime event applied");
        outcome
    }

    /// Consume events until the subscription closes or `shutdown` fires
    pub fn listen(
        self: &Arc<Self>,
        mut subscription: Subscription,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let board = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    event = subscription.recv() => match event {
                        Some(event) => {
                            board.apply_event(event);
                        }
                        None => break,
                    },
                }
            }
        })
    }

    /// Cache of the selected branch, if one is selected
    fn selected(&self) -> Option<std::sync::MutexGuard<'_, BoardState>> {
        self.session.branch().map(|branch| self.lock_for(&branch))
    }

    /// Orders of the selected branch, oldest first
    pub fn orders(&self) -> Vec<Order> {
        let Some(state) = self.selected() else {
            return Vec::new();
        };
        let mut orders: Vec<Order> = state.orders.values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        orders
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.selected()?.orders.get(order_id).cloned()
    }

    /// Unpaid orders, oldest first
    pub fn unpaid(&self) -> Vec<Order> {
        self.orders().into_iter().filter(|o| !o.is_paid()).collect()
    }

    /// Kitchen display: open items grouped by status (pending, preparing, ready)
    pub fn kitchen_queue(&self) -> Vec<(ItemStatus, Vec<KitchenTicket>)> {
        let orders = self.orders();
        [ItemStatus::Pending, ItemStatus::Preparing, ItemStatus::Ready]
            .into_iter()
            .map(|status| {
                let tickets = orders
                    .iter()
                    .flat_map(|order| {
                        order
                            .items
                            .iter()
                            .filter(move |item| item.status == status)
                            .map(move |item| KitchenTicket {
                                order_id: order.id.clone(),
                                customer_name: order.customer_name.clone(),
                                item: item.clone(),
                            })
                    })
                    .collect();
                (status, tickets)
            })
            .collect()
    }

    fn store(&self, order: Order) {
        let Some(mut state) = self.selected() else {
            return;
        };
        if !state.orders.upsert(order) {
            tracing::debug!("Server response older than cached order, keeping cache");
        }
    }

    pub async fn create(&self, order: OrderCreate) -> ClientResult<Order> {
        self.session.require(Capability::TakeOrders)?;
        let created = self.api.create(&order).await?;
        self.store(created.clone());
        Ok(created)
    }

    /// Set an item's status, optimistically
    pub async fn set_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order> {
        self.session.require(Capability::PrepareOrders)?;
        let original = self
            .order(order_id)
            .ok_or_else(|| ClientError::NotFound(format!("Order {order_id}")))?;
        let optimistic = original.with_item_status(item_id, status)?;
        self.store(optimistic);

        match self.api.update_item_status(order_id, item_id, status).await {
            Ok(confirmed) => {
                self.store(confirmed.clone());
                Ok(confirmed)
            }
            Err(e) => {
                tracing::warn!(order_id, item_id, "Item status update failed, restoring: {e}");
                // Same version as the optimistic copy; a newer push wins over it
                self.store(original);
                Err(e)
            }
        }
    }

    /// Move an item to the next kitchen status
    pub async fn advance_item(&self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        let current = self
            .order(order_id)
            .and_then(|o| o.item(item_id).map(|i| i.status))
            .ok_or_else(|| ClientError::NotFound(format!("Item {item_id} of order {order_id}")))?;
        let Some(next) = current.next() else {
            return Err(ClientError::Validation(shared::AppError::invalid(
                "Item has already been served",
            )));
        };
        self.set_item_status(order_id, item_id, next).await
    }

    pub async fn mark_paid(&self, order_id: &str, method: PaymentMethod) -> ClientResult<Order> {
        self.session.require(Capability::CollectPayment)?;
        if self.order(order_id).is_some_and(|o| o.is_paid()) {
            return Err(ClientError::Validation(shared::AppError::new(
                shared::ErrorCode::OrderAlreadyPaid,
            )));
        }
        let paid = self.api.mark_paid(order_id, method).await?;
        self.store(paid.clone());
        Ok(paid)
    }

    pub async fn append_items(&self, order_id: &str, append: OrderAppend) -> ClientResult<Order> {
        self.session.require(Capability::TakeOrders)?;
        let updated = self.api.append_items(order_id, &append).await?;
        self.store(updated.clone());
        Ok(updated)
    }

    pub async fn delete(&self, order_id: &str) -> ClientResult<()> {
        self.session.require(Capability::TakeOrders)?;
        self.api.delete(order_id).await?;
        if let Some(mut state) = self.selected() {
            state.orders.remove(order_id, None);
        }
        Ok(())
    }
}
