//! End-of-day sales summary
//!
//! The draft is built from the day's paid orders. The order taker can then
//! correct the cash/GCash split before submitting; submission is refused
//! unless the split adds up to the items total.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{Capability, DailySummary, DailySummaryCreate, PaymentStatus};

use crate::ClientResult;
use crate::api::{OrderApi, OrderQuery, SummaryApi};
use crate::session::Session;

pub struct DailySummaryView {
    session: Arc<Session>,
    orders: Arc<dyn OrderApi>,
    summaries: Arc<dyn SummaryApi>,
}

impl DailySummaryView {
    pub fn new(
        session: Arc<Session>,
        orders: Arc<dyn OrderApi>,
        summaries: Arc<dyn SummaryApi>,
    ) -> Self {
        Self {
            session,
            orders,
            summaries,
        }
    }

    /// Draft summary for `date` at the selected branch
    pub async fn draft(&self, date: NaiveDate) -> ClientResult<DailySummaryCreate> {
        self.session.require(Capability::SubmitDailySummary)?;
        let branch = self.session.require_branch()?;
        let query = OrderQuery::branch(&branch)
            .with_payment_status(PaymentStatus::Paid)
            .on(date);
        let orders = self.orders.list(&query).await?;
        Ok(DailySummaryCreate::from_orders(branch, date, &orders))
    }

    /// Validate and submit a summary
    pub async fn submit(&self, summary: &DailySummaryCreate) -> ClientResult<DailySummary> {
        let user = self.session.require(Capability::SubmitDailySummary)?;
        summary.validate()?;
        let submitted = self.summaries.submit(summary).await?;
        tracing::info!(
            user_id = %user.id,
            branch = %submitted.branch_id,
            date = %submitted.date,
            total = submitted.total,
            "Daily summary submitted"
        );
        Ok(submitted)
    }

    /// Past summaries of the selected branch, newest first
    pub async fn history(&self) -> ClientResult<Vec<DailySummary>> {
        self.session.require(Capability::SubmitDailySummary)?;
        let branch = self.session.require_branch()?;
        let mut summaries = self.summaries.list(&branch).await?;
        summaries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::started;
    use crate::{ClientError, ClientResult};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use shared::error::ErrorCode;
    use shared::models::{
        ItemStatus, ItemType, Order, OrderAppend, OrderCreate, OrderItem, PaymentMethod, Role,
    };
    use std::sync::Mutex;

    fn paid(id: &str, name: &str, price: f64, qty: u32, method: PaymentMethod) -> Order {
        Order {
            id: id.into(),
            customer_name: "Walk-in".into(),
            items: vec![OrderItem {
                id: format!("{id}-1"),
                menu_item_id: None,
                name: name.into(),
                price,
                quantity: qty,
                status: ItemStatus::Served,
                item_type: ItemType::Drink,
            }],
            payment_status: PaymentStatus::Paid,
            payment_method: Some(method),
            appended_orders: vec![],
            branch_id: Some("b1".into()),
            version: 3,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            updated_at: None,
        }
    }

    struct FakeOrders {
        orders: Vec<Order>,
        queries: Mutex<Vec<OrderQuery>>,
    }

    fn unsupported<T>() -> ClientResult<T> {
        Err(ClientError::NotFound("unsupported in fake".into()))
    }

    #[async_trait]
    impl OrderApi for FakeOrders {
        async fn list(&self, query: &OrderQuery) -> ClientResult<Vec<Order>> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.orders.clone())
        }
        async fn get(&self, _order_id: &str) -> ClientResult<Order> {
            unsupported()
        }
        async fn create(&self, _order: &OrderCreate) -> ClientResult<Order> {
            unsupported()
        }
        async fn update_item_status(&self, _o: &str, _i: &str, _s: ItemStatus) -> ClientResult<Order> {
            unsupported()
        }
        async fn mark_paid(&self, _order_id: &str, _method: PaymentMethod) -> ClientResult<Order> {
            unsupported()
        }
        async fn append_items(&self, _order_id: &str, _append: &OrderAppend) -> ClientResult<Order> {
            unsupported()
        }
        async fn delete(&self, _order_id: &str) -> ClientResult<()> {
            unsupported()
        }
    }

    #[derive(Default)]
    struct FakeSummaries {
        submitted: Mutex<Vec<DailySummaryCreate>>,
    }

    #[async_trait]
    impl SummaryApi for FakeSummaries {
        async fn list(&self, branch_id: &str) -> ClientResult<Vec<DailySummary>> {
            let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
            Ok([1, 3, 2]
                .into_iter()
                .map(|d| DailySummary {
                    id: format!("s{d}"),
                    branch_id: branch_id.into(),
                    date: day(d),
                    items: vec![],
                    total: 0.0,
                    cash: 0.0,
                    gcash: 0.0,
                    submitted_by: None,
                    created_at: None,
                })
                .collect())
        }
        async fn submit(&self, summary: &DailySummaryCreate) -> ClientResult<DailySummary> {
            self.submitted.lock().unwrap().push(summary.clone());
            Ok(DailySummary {
                id: "s-new".into(),
                branch_id: summary.branch_id.clone(),
                date: summary.date,
                items: summary.items.clone(),
                total: 500.0,
                cash: summary.cash,
                gcash: summary.gcash,
                submitted_by: Some("u1".into()),
                created_at: None,
            })
        }
    }

    async fn view(role: Role) -> (DailySummaryView, Arc<FakeOrders>, Arc<FakeSummaries>) {
        let orders = Arc::new(FakeOrders {
            orders: vec![
                paid("o1", "Latte", 150.0, 2, PaymentMethod::Cash),
                paid("o2", "Croissant", 100.0, 2, PaymentMethod::Gcash),
            ],
            queries: Mutex::new(vec![]),
        });
        let summaries = Arc::new(FakeSummaries::default());
        let view = DailySummaryView::new(started(role, "b1").await, orders.clone(), summaries.clone());
        (view, orders, summaries)
    }

    #[tokio::test]
    async fn test_draft_from_paid_orders() {
        let (view, orders, _) = view(Role::OrderTaker).await;
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let draft = view.draft(date).await.unwrap();

        let query = orders.queries.lock().unwrap()[0].clone();
        assert_eq!(query.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(query.date, Some(date));
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[0].name, "Croissant");
        assert_eq!(draft.cash, 300.0);
        assert_eq!(draft.gcash, 200.0);
        assert!(draft.validate().is_ok());
    }

    #[tokio::test]
    async fn test_mismatched_split_not_submitted() {
        let (view, _, summaries) = view(Role::OrderTaker).await;
        let mut draft = view.draft(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).await.unwrap();
        draft.gcash = 150.0;

        let err = view.submit(&draft).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentSplitMismatch);
        assert!(summaries.submitted.lock().unwrap().is_empty());

        draft.gcash = 200.0;
        let submitted = view.submit(&draft).await.unwrap();
        assert_eq!(submitted.submitted_by.as_deref(), Some("u1"));
        assert_eq!(summaries.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let (view, _, _) = view(Role::OrderTakerCrew).await;
        let ids: Vec<_> = view.history().await.unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["s3", "s2", "s1"]);
    }

    #[tokio::test]
    async fn test_crew_cannot_submit() {
        let (view, _, _) = view(Role::Crew).await;
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(matches!(view.draft(date).await, Err(ClientError::Forbidden(_))));
    }
}
