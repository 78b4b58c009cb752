//! Notification events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    OrderCreated(OrderEvent),
    /// Staff stopped the timer early
    OrderStopped(OrderReleasedEvent),
    /// Paid time ran out
    OrderExpired(OrderReleasedEvent),
    OrderExtended(OrderEvent),
    OrderItemsReplaced(OrderEvent),
    OrderPaid(OrderEvent),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::OrderCreated(_) => "order_created",
            Event::OrderStopped(_) => "order_stopped",
            Event::OrderExpired(_) => "order_expired",
            Event::OrderExtended(_) => "order_extended",
            Event::OrderItemsReplaced(_) => "order_items_replaced",
            Event::OrderPaid(_) => "order_paid",
        }
    }

    pub fn pool_table_id(&self) -> &str {
        match self {
            Event::OrderCreated(e)
            | Event::OrderExtended(e)
            | Event::OrderItemsReplaced(e)
            | Event::OrderPaid(e) => &e.pool_table_id,
            Event::OrderStopped(e) | Event::OrderExpired(e) => &e.pool_table_id,
        }
    }

    pub fn order_id(&self) -> &str {
        match self {
            Event::OrderCreated(e)
            | Event::OrderExtended(e)
            | Event::OrderItemsReplaced(e)
            | Event::OrderPaid(e) => &e.order_id,
            Event::OrderStopped(e) | Event::OrderExpired(e) => &e.order_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub order_id: String,
    pub pool_table_id: String,
    pub customer_name: String,
    pub duration_hours: i32,
    pub ends_at: DateTime<Utc>,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReleasedEvent {
    pub order_id: String,
    pub pool_table_id: String,
    pub device_id: String,
    pub released_at: DateTime<Utc>,
}

/// Envelope sent over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let message = EventMessage::new(Event::OrderExpired(OrderReleasedEvent {
            order_id: "o-1".into(),
            pool_table_id: "t-1".into(),
            device_id: "4".into(),
            released_at: Utc::now(),
        }));
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["type"], "order_expired");
        assert_eq!(json["data"]["device_id"], "4");
        assert_eq!(message.event.pool_table_id(), "t-1");
        assert_eq!(message.event.order_id(), "o-1");
    }
}
