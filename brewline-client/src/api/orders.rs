//! Orders API

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use shared::client::MessageResponse;
use shared::models::{
    ItemStatus, ItemStatusUpdate, Order, OrderAppend, OrderCreate, OrderPayment, PaymentMethod,
    PaymentStatus,
};
use urlencoding::encode;

use crate::{ClientResult, HttpClient};

/// Order list filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub branch_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl OrderQuery {
    pub fn branch(branch_id: impl Into<String>) -> Self {
        Self {
            branch_id: branch_id.into(),
            ..Default::default()
        }
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn list(&self, query: &OrderQuery) -> ClientResult<Vec<Order>>;
    async fn get(&self, order_id: &str) -> ClientResult<Order>;
    async fn create(&self, order: &OrderCreate) -> ClientResult<Order>;
    async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order>;
    async fn mark_paid(&self, order_id: &str, method: PaymentMethod) -> ClientResult<Order>;
    /// Append items to an existing order; the server records the reference
    async fn append_items(&self, order_id: &str, append: &OrderAppend) -> ClientResult<Order>;
    async fn delete(&self, order_id: &str) -> ClientResult<()>;
}

#[derive(Debug, Clone)]
pub struct OrdersClient {
    http: HttpClient,
}

impl OrdersClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl OrderApi for OrdersClient {
    async fn list(&self, query: &OrderQuery) -> ClientResult<Vec<Order>> {
        self.http.get_query("/api/orders", query).await
    }

    async fn get(&self, order_id: &str) -> ClientResult<Order> {
        self.http.get(&format!("/api/orders/{}", encode(order_id))).await
    }

    async fn create(&self, order: &OrderCreate) -> ClientResult<Order> {
        order.validate()?;
        let created: Order = self.http.post("/api/orders", order).await?;
        tracing::info!(order_id = %created.id, branch_id = %order.branch_id, "Order created");
        Ok(created)
    }

    async fn update_item_status(
        &self,
        order_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> ClientResult<Order> {
        self.http
            .patch(
                &format!("/api/orders/{}/items/{}/status", encode(order_id), encode(item_id)),
                &ItemStatusUpdate { status },
            )
            .await
    }

    async fn mark_paid(&self, order_id: &str, method: PaymentMethod) -> ClientResult<Order> {
        let order: Order = self
            .http
            .patch(
                &format!("/api/orders/{}/payment", encode(order_id)),
                &OrderPayment {
                    payment_method: method,
                },
            )
            .await?;
        tracing::info!(order_id, ?method, "Order paid");
        Ok(order)
    }

    async fn append_items(&self, order_id: &str, append: &OrderAppend) -> ClientResult<Order> {
        append.validate()?;
        self.http
            .post(&format!("/api/orders/{}/append", encode(order_id)), append)
            .await
    }

    async fn delete(&self, order_id: &str) -> ClientResult<()> {
        self.http
            .delete::<Option<MessageResponse>>(&format!("/api/orders/{}", encode(order_id)))
            .await?;
        tracing::info!(order_id, "Order deleted");
        Ok(())
    }
}
