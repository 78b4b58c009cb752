//! Order DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::NewOrder;
use crate::domain::{OrderDetails, OrderLine, OrderLineDetails};

/// One F&B line on an order request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub item_id: String,
    #[validate(range(min = 1, max = 10000, message = "must be between 1 and 10000"))]
    pub quantity: i32,
}

fn to_lines(items: Vec<OrderItemRequest>) -> Vec<OrderLine> {
    items
        .into_iter()
        .map(|item| OrderLine::new(item.item_id, item.quantity))
        .collect()
}

/// Open a table for a customer
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "pool_table_id": "8a4c3f0e-2b7d-4c55-9f65-0d2f6b1e7a10",
    "customer_name": "Andi",
    "duration_hours": 2,
    "items": [{"item_id": "5d1f9c3a-7e21-4b8e-a0c4-3b2e9f6d8a11", "quantity": 2}]
}))]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub pool_table_id: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub customer_name: String,
    #[validate(range(min = 1, max = 168, message = "must be between 1 and 168"))]
    pub duration_hours: i32,
    /// Repeated item ids are merged
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        Self {
            pool_table_id: req.pool_table_id,
            customer_name: req.customer_name,
            duration_hours: req.duration_hours,
            items: to_lines(req.items),
        }
    }
}

/// Optional body of the stop endpoint
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct StopOrderRequest {
    /// When the timer was stopped. Defaults to now
    pub stop_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"hours": 1}))]
pub struct ExtendOrderRequest {
    #[validate(range(min = 1, max = 168, message = "must be between 1 and 168"))]
    pub hours: i32,
}

/// The full new set of F&B lines; an empty list clears them
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceItemsRequest {
    #[validate(nested)]
    pub items: Vec<OrderItemRequest>,
}

impl ReplaceItemsRequest {
    pub fn into_lines(self) -> Vec<OrderLine> {
        to_lines(self.items)
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct PayOrderRequest {
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersQuery {
    /// Venue-local day `YYYY-MM-DD`. Today when missing or invalid
    pub date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineDto {
    pub item_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
    pub subtotal: i64,
}

impl From<OrderLineDetails> for OrderLineDto {
    fn from(line: OrderLineDetails) -> Self {
        Self {
            subtotal: line.subtotal(),
            item_id: line.item_id,
            name: line.name,
            price: line.price,
            quantity: line.quantity,
        }
    }
}

/// Order with its table, lines and bill
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: String,
    pub pool_table_id: String,
    pub table_name: String,
    pub table_price: i64,
    pub device_id: String,
    pub customer_name: String,
    pub duration_hours: i32,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// `true` once the table has been released
    pub time_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    pub ends_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    pub items: Vec<OrderLineDto>,
    pub table_cost: i64,
    pub fnb_cost: i64,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderDetails> for OrderDto {
    fn from(d: OrderDetails) -> Self {
        let table_cost = d.table_cost();
        let fnb_cost = d.fnb_cost();
        let ends_at = d.order.ends_at();
        let order = d.order;
        Self {
            id: order.id,
            pool_table_id: order.pool_table_id,
            table_name: d.table_name,
            table_price: d.table_price,
            device_id: d.device_id,
            customer_name: order.customer_name,
            duration_hours: order.duration_hours,
            paid: order.paid,
            note: order.note,
            time_out: order.time_out,
            paused_at: order.paused_at,
            ends_at,
            created_by: order.created_by,
            creator_name: d.creator_name,
            creator_email: d.creator_email,
            items: d.lines.into_iter().map(OrderLineDto::from).collect(),
            table_cost,
            fnb_cost,
            total: table_cost + fnb_cost,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;

    #[test]
    fn bill_is_flattened() {
        let order = Order::new("t1", "Andi", 2, None);
        let details = OrderDetails {
            order,
            table_name: "Meja 1".into(),
            table_price: 30_000,
            device_id: "1".into(),
            lines: vec![OrderLineDetails {
                item_id: "kopi".into(),
                name: "Kopi".into(),
                price: 12_000,
                quantity: 2,
            }],
            creator_name: None,
            creator_email: None,
        };

        let dto = OrderDto::from(details);
        assert_eq!(dto.table_cost, 60_000);
        assert_eq!(dto.fnb_cost, 24_000);
        assert_eq!(dto.total, 84_000);
        assert_eq!(dto.items[0].subtotal, 24_000);
        assert_eq!(dto.ends_at, dto.created_at + chrono::Duration::hours(2));

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("note").is_none());
        assert_eq!(json["time_out"], false);
    }

    #[test]
    fn create_request_rules() {
        let req: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "pool_table_id": "t1",
            "customer_name": "",
            "duration_hours": 0
        }))
        .unwrap();
        assert!(req.items.is_empty());
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("customer_name"));
        assert!(fields.contains_key("duration_hours"));
    }

    #[test]
    fn oversized_numbers_are_rejected() {
        let req: CreateOrderRequest = serde_json::from_value(serde_json::json!({
            "pool_table_id": "t1",
            "customer_name": "Andi",
            "duration_hours": 2147483647,
            "items": [{"item_id": "kopi", "quantity": 10001}]
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("duration_hours"));
        assert!(errors.errors().contains_key("items"));

        let extend = ExtendOrderRequest { hours: 169 };
        assert!(extend.validate().is_err());
        assert!(ExtendOrderRequest { hours: 168 }.validate().is_ok());
    }
}
