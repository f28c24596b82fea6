//! Inventory API

use async_trait::async_trait;
use shared::client::MessageResponse;
use shared::models::{InventoryCreate, InventoryItem, StockAdjustment};
use urlencoding::encode;

use super::BranchQuery;
use crate::{ClientResult, HttpClient};

#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn list(&self, branch_id: &str) -> ClientResult<Vec<InventoryItem>>;
    async fn create(&self, item: &InventoryCreate) -> ClientResult<InventoryItem>;
    async fn adjust(&self, item_id: &str, adjustment: &StockAdjustment)
    -> ClientResult<InventoryItem>;
    async fn delete(&self, item_id: &str) -> ClientResult<()>;

    /// Items at or below their low-stock threshold
    async fn low_stock(&self, branch_id: &str) -> ClientResult<Vec<InventoryItem>> {
        let mut items: Vec<_> = self
            .list(branch_id)
            .await?
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    /// Adjust after checking locally that stock would not go negative
    async fn adjust_checked(
        &self,
        item: &InventoryItem,
        delta: f64,
        reason: Option<String>,
    ) -> ClientResult<InventoryItem> {
        item.adjusted_quantity(delta)?;
        self.adjust(&item.id, &StockAdjustment { delta, reason })
            .await
    }
}

#[derive(Debug, Clone)]
pub struct InventoryClient {
    http: HttpClient,
}

impl InventoryClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl InventoryApi for InventoryClient {
    async fn list(&self, branch_id: &str) -> ClientResult<Vec<InventoryItem>> {
        self.http
            .get_query("/api/inventory", &BranchQuery { branch_id })
            .await
    }

    async fn create(&self, item: &InventoryCreate) -> ClientResult<InventoryItem> {
        item.validate()?;
        self.http.post("/api/inventory", item).await
    }

    async fn adjust(
        &self,
        item_id: &str,
        adjustment: &StockAdjustment,
    ) -> ClientResult<InventoryItem> {
        let item: InventoryItem = self
            .http
            .patch(&format!("/api/inventory/{}/adjust", encode(item_id)), adjustment)
            .await?;
        if item.is_low_stock() {
            tracing::warn!(item = %item.name, quantity = item.quantity, "Inventory low");
        }
        Ok(item)
    }

    async fn delete(&self, item_id: &str) -> ClientResult<()> {
        self.http
            .delete::<Option<MessageResponse>>(&format!("/api/inventory/{}", encode(item_id)))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use shared::error::ErrorCode;
    use std::sync::Mutex;

    /// Fake holding one item; records adjustments
    struct FakeInventory {
        items: Vec<InventoryItem>,
        adjusted: Mutex<Vec<f64>>,
    }

    #[async_trait]
    impl InventoryApi for FakeInventory {
        async fn list(&self, _branch_id: &str) -> ClientResult<Vec<InventoryItem>> {
            Ok(self.items.clone())
        }
        async fn create(&self, _item: &InventoryCreate) -> ClientResult<InventoryItem> {
            unimplemented!()
        }
        async fn adjust(&self, item_id: &str, adjustment: &StockAdjustment) -> ClientResult<InventoryItem> {
            self.adjusted.lock().unwrap().push(adjustment.delta);
            let mut item = self.items.iter().find(|i| i.id == item_id).cloned().unwrap();
            item.quantity += adjustment.delta;
            Ok(item)
        }
        async fn delete(&self, _item_id: &str) -> ClientResult<()> {
            Ok(())
        }
    }

    fn item(id: &str, name: &str, quantity: f64) -> InventoryItem {
        InventoryItem {
            id: id.into(),
            name: name.into(),
            quantity,
            unit: "pcs".into(),
            low_stock_threshold: 5.0,
            branch_id: Some("b1".into()),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_low_stock_sorted() {
        let fake = FakeInventory {
            items: vec![item("1", "Cups", 3.0), item("2", "Beans", 40.0), item("3", "Arabica", 5.0)],
            adjusted: Mutex::new(vec![]),
        };
        let low = fake.low_stock("b1").await.unwrap();
        let names: Vec<_> = low.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Arabica", "Cups"]);
    }

    #[tokio::test]
    async fn test_adjust_checked_blocks_negative_stock() {
        let cups = item("1", "Cups", 3.0);
        let fake = FakeInventory {
            items: vec![cups.clone()],
            adjusted: Mutex::new(vec![]),
        };
        let err = fake.adjust_checked(&cups, -4.0, None).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ref e) if e.code == ErrorCode::InsufficientStock));
        assert!(fake.adjusted.lock().unwrap().is_empty());

        let updated = fake.adjust_checked(&cups, 10.0, Some("delivery".into())).await.unwrap();
        assert_eq!(updated.quantity, 13.0);
    }
}
