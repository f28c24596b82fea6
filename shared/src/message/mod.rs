//! Realtime channel message types
//!
//! The push channel sends JSON text frames shaped as
//! `{"event": "order:updated", "data": {...}, "branchId": "..."}`.
//! `data` is a full Order for created/updated events and `{"_id", "version"?}`
//! for deletions. Deletions carry no branch tag.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::Order;

/// Order created
pub const ORDER_CREATED: &str = "order:created";
/// Order updated (status change, payment, appended items)
pub const ORDER_UPDATED: &str = "order:updated";
/// Order deleted
pub const ORDER_DELETED: &str = "order:deleted";

/// Known channel event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    OrderCreated,
    OrderUpdated,
    OrderDeleted,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::OrderCreated => ORDER_CREATED,
            EventType::OrderUpdated => ORDER_UPDATED,
            EventType::OrderDeleted => ORDER_DELETED,
        }
    }
}

impl TryFrom<&str> for EventType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            ORDER_CREATED => Ok(EventType::OrderCreated),
            ORDER_UPDATED => Ok(EventType::OrderUpdated),
            ORDER_DELETED => Ok(EventType::OrderDeleted),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw frame envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

impl ChannelEvent {
    pub fn new(event: EventType, data: Value) -> Self {
        Self {
            event: event.as_str().to_string(),
            data,
            branch_id: None,
        }
    }

    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Build a created/updated frame from an order
    pub fn for_order(event: EventType, order: &Order) -> Result<Self, serde_json::Error> {
        let mut frame = Self::new(event, serde_json::to_value(order)?);
        frame.branch_id = order.branch_id.clone();
        Ok(frame)
    }

    pub fn event_type(&self) -> Option<EventType> {
        EventType::try_from(self.event.as_str()).ok()
    }

    /// Parse the payload as `T`
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Deletion payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

/// Decoded order event
#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    Created {
        order: Order,
        branch_id: Option<String>,
    },
    Updated {
        order: Order,
        branch_id: Option<String>,
    },
    Deleted {
        id: String,
        version: Option<u64>,
    },
}

impl OrderEvent {
    /// Decode a frame; unknown event names yield `Ok(None)`
    pub fn from_channel(frame: &ChannelEvent) -> Result<Option<Self>, serde_json::Error> {
        let Some(kind) = frame.event_type() else {
            return Ok(None);
        };
        let event = match kind {
            EventType::OrderCreated | EventType::OrderUpdated => {
                let order: Order = frame.parse_payload()?;
                let branch_id = frame.branch_id.clone().or_else(|| order.branch_id.clone());
                if kind == EventType::OrderCreated {
                    OrderEvent::Created { order, branch_id }
                } else {
                    OrderEvent::Updated { order, branch_id }
                }
            }
            EventType::OrderDeleted => {
                let deleted: DeletedRef = frame.parse_payload()?;
                OrderEvent::Deleted {
                    id: deleted.id,
                    version: deleted.version,
                }
            }
        };
        Ok(Some(event))
    }

    pub fn event_type(&self) -> EventType {
        match self {
            OrderEvent::Created { .. } => EventType::OrderCreated,
            OrderEvent::Updated { .. } => EventType::OrderUpdated,
            OrderEvent::Deleted { .. } => EventType::OrderDeleted,
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            OrderEvent::Created { order, .. } | OrderEvent::Updated { order, .. } => &order.id,
            OrderEvent::Deleted { id, .. } => id,
        }
    }

    /// Branch tag, `None` for deletions and untagged orders
    pub fn branch(&self) -> Option<&str> {
        match self {
            OrderEvent::Created { branch_id, .. } | OrderEvent::Updated { branch_id, .. } => {
                branch_id.as_deref()
            }
            OrderEvent::Deleted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_json(branch: &str) -> Value {
        json!({
            "_id": "o1",
            "customerName": "Ana",
            "items": [{"_id": "i1", "name": "Latte", "price": 150, "quantity": 1, "status": "pending"}],
            "branchId": branch,
            "version": 3,
            "createdAt": "2024-05-01T09:00:00Z"
        })
    }

    #[test]
    fn test_decode_updated_with_envelope_branch() {
        let text = json!({"event": "order:updated", "data": order_json("b1"), "branchId": "b2"}).to_string();
        let frame = ChannelEvent::from_text(&text).unwrap();
        let event = OrderEvent::from_channel(&frame).unwrap().unwrap();
        assert_eq!(event.event_type(), EventType::OrderUpdated);
        assert_eq!(event.order_id(), "o1");
        assert_eq!(event.branch(), Some("b2"));
    }

    #[test]
    fn test_decode_created_falls_back_to_order_branch() {
        let frame = ChannelEvent::new(EventType::OrderCreated, order_json("b1"));
        let event = OrderEvent::from_channel(&frame).unwrap().unwrap();
        assert_eq!(event.branch(), Some("b1"));
    }

    #[test]
    fn test_decode_deleted() {
        let frame = ChannelEvent::new(EventType::OrderDeleted, json!({"_id": "o9", "version": 4}));
        let event = OrderEvent::from_channel(&frame).unwrap().unwrap();
        assert_eq!(
            event,
            OrderEvent::Deleted { id: "o9".into(), version: Some(4) }
        );
        assert_eq!(event.branch(), None);
    }

    #[test]
    fn test_unknown_event_ignored() {
        let frame = ChannelEvent::new(EventType::OrderCreated, Value::Null);
        let unknown = ChannelEvent { event: "menu:updated".into(), ..frame };
        assert!(OrderEvent::from_channel(&unknown).unwrap().is_none());
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let frame = ChannelEvent::new(EventType::OrderUpdated, json!({"nope": true}));
        assert!(OrderEvent::from_channel(&frame).is_err());
    }
}
