//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::money;

/// Per-item preparation status shown on the kitchen display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
}

impl ItemStatus {
    /// Next status in the kitchen flow, `None` once served
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Served),
            Self::Served => None,
        }
    }
}

/// Item type decides which station prepares it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Drink,
    Food,
    #[serde(other)]
    Other,
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// Payment method recorded when an order is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Gcash,
}

/// Ordered item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Menu item this line was ordered from
    #[serde(default)]
    pub menu_item_id: Option<String>,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub item_type: ItemType,
}

impl OrderItem {
    /// Line total (price × quantity)
    pub fn line_total(&self) -> rust_decimal::Decimal {
        money::to_decimal(self.price) * rust_decimal::Decimal::from(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Orders appended to this one after it was placed
    #[serde(default)]
    pub appended_orders: Vec<String>,
    /// Owning branch
    #[serde(default)]
    pub branch_id: Option<String>,
    /// Monotonic per-order revision, bumped by the server on every write
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order total
    pub fn total(&self) -> f64 {
        money::to_f64(self.items.iter().map(OrderItem::line_total).sum())
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Find an item by id
    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Whether every item has been served
    pub fn is_fulfilled(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|i| i.status == ItemStatus::Served)
    }

    /// Whether the order belongs to `branch_id`
    ///
    /// Orders without a branch tag predate branch scoping and match every branch.
    pub fn belongs_to(&self, branch_id: &str) -> bool {
        self.branch_id.as_deref().is_none_or(|b| b == branch_id)
    }

    /// Copy of this order with one item's status changed
    pub fn with_item_status(&self, item_id: &str, status: ItemStatus) -> AppResult<Order> {
        let mut next = self.clone();
        let item = next
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound).with_detail("itemId", item_id))?;
        item.status = status;
        Ok(next)
    }
}

/// Item input when creating or appending to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub item_type: ItemType,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub customer_name: String,
    pub items: Vec<OrderItemInput>,
    pub branch_id: String,
}

impl OrderCreate {
    /// Client-side checks before submitting
    pub fn validate(&self) -> AppResult<()> {
        super::require_text(&self.customer_name, "customerName")?;
        super::require_text(&self.branch_id, "branchId")?;
        validate_items(&self.items)
    }
}

/// Append items to an existing order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAppend {
    pub items: Vec<OrderItemInput>,
}

impl OrderAppend {
    pub fn validate(&self) -> AppResult<()> {
        validate_items(&self.items)
    }
}

fn validate_items(items: &[OrderItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for item in items {
        super::require_text(&item.name, "items.name")?;
        money::require_non_negative(item.price, "items.price")?;
        if item.quantity == 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Quantity for {} must be at least 1", item.name),
            ));
        }
    }
    Ok(())
}

/// Update a single item's status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStatusUpdate {
    pub status: ItemStatus,
}

/// Mark an order paid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            menu_item_id: None,
            name: format!("item-{id}"),
            price,
            quantity,
            status: ItemStatus::Pending,
            item_type: ItemType::Drink,
        }
    }

    #[test]
    fn test_deserialize_wire_order() {
        let json = r#"{
            "_id": "o1",
            "customerName": "Ana",
            "items": [{"_id": "i1", "name": "Latte", "price": 120, "quantity": 2, "status": "ready", "itemType": "drink"}],
            "paymentStatus": "paid",
            "branchId": "b1",
            "createdAt": "2024-05-01T08:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "o1");
        assert_eq!(order.items[0].status, ItemStatus::Ready);
        assert!(order.is_paid());
        assert_eq!(order.version, 0);
        assert_eq!(order.total(), 240.0);
    }

    #[test]
    fn test_unknown_item_type_maps_to_other() {
        let json = r#"{"id": "i1", "name": "Mug", "price": 300, "quantity": 1, "itemType": "merch"}"#;
        let item: OrderItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_type, ItemType::Other);
    }

    #[test]
    fn test_total_uses_decimal() {
        let order = Order {
            id: "o1".into(),
            customer_name: "Ben".into(),
            items: vec![item("a", 0.1, 1), item("b", 0.2, 1)],
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            appended_orders: vec![],
            branch_id: None,
            version: 0,
            created_at: Utc::now(),
            updated_at: None,
        };
        assert_eq!(order.total(), 0.3);
        assert!(order.belongs_to("any-branch"));
    }

    #[test]
    fn test_with_item_status() {
        let order = Order {
            id: "o1".into(),
            customer_name: "Ben".into(),
            items: vec![item("a", 100.0, 1)],
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            appended_orders: vec![],
            branch_id: Some("b1".into()),
            version: 3,
            created_at: Utc::now(),
            updated_at: None,
        };
        let next = order.with_item_status("a", ItemStatus::Served).unwrap();
        assert!(next.is_fulfilled());
        assert_eq!(order.items[0].status, ItemStatus::Pending);

        let err = order.with_item_status("missing", ItemStatus::Ready).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);
    }

    #[test]
    fn test_item_status_flow() {
        assert_eq!(ItemStatus::Pending.next(), Some(ItemStatus::Preparing));
        assert_eq!(ItemStatus::Ready.next(), Some(ItemStatus::Served));
        assert_eq!(ItemStatus::Served.next(), None);
    }

    #[test]
    fn test_create_validation() {
        let mut create = OrderCreate {
            customer_name: "  ".into(),
            items: vec![],
            branch_id: "b1".into(),
        };
        assert_eq!(create.validate().unwrap_err().code, ErrorCode::RequiredField);

        create.customer_name = "Ana".into();
        assert_eq!(create.validate().unwrap_err().code, ErrorCode::OrderEmpty);

        create.items.push(OrderItemInput {
            menu_item_id: "m1".into(),
            name: "Latte".into(),
            price: 120.0,
            quantity: 0,
            item_type: ItemType::Drink,
        });
        assert_eq!(create.validate().unwrap_err().code, ErrorCode::ValueOutOfRange);

        create.items[0].quantity = 1;
        assert!(create.validate().is_ok());
    }
}
