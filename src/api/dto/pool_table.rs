//! Pool table and floor DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{PoolTableInput, TableSlot};
use crate::domain::{DomainError, DomainResult, PoolTable, TableStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct PoolTableDto {
    pub id: String,
    pub name: String,
    /// Rent per hour
    pub price: i64,
    pub device_id: String,
    /// `available` or `unavailable`
    pub status: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PoolTable> for PoolTableDto {
    fn from(t: PoolTable) -> Self {
        Self {
            id: t.id,
            name: t.name,
            price: t.price,
            device_id: t.device_id,
            status: t.status.as_str().to_string(),
            active: t.active,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Create or replace a table
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Meja 1",
    "price": 30000,
    "device_id": "1"
}))]
pub struct PoolTableRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 1000000000000i64, message = "must be between 1 and 1000000000000"))]
    pub price: i64,
    /// Number used in the lamp topic payload (`meja<device_id>_on`)
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub device_id: String,
    /// `available` or `unavailable`. Defaults to `available`
    pub status: Option<String>,
    /// Defaults to `true`
    pub active: Option<bool>,
}

impl PoolTableRequest {
    pub fn into_input(self) -> DomainResult<PoolTableInput> {
        let status = match self.status.as_deref() {
            None => None,
            Some(raw) => Some(TableStatus::parse(raw).ok_or_else(|| {
                DomainError::Validation(format!("Unknown table status '{}'", raw))
            })?),
        };
        Ok(PoolTableInput {
            name: self.name,
            price: self.price,
            device_id: self.device_id,
            status,
            active: self.active,
        })
    }
}

/// One tile of the floor screen
#[derive(Debug, Serialize, ToSchema)]
pub struct FloorSlotDto {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub device_id: String,
    pub status: String,
    /// `idle`, `running`, `ending_soon` or `expired`
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<i64>,
}

impl From<TableSlot> for FloorSlotDto {
    fn from(slot: TableSlot) -> Self {
        let order = slot.order;
        Self {
            id: slot.table.id,
            name: slot.table.name,
            price: slot.table.price,
            device_id: slot.table.device_id,
            status: slot.table.status.as_str().to_string(),
            phase: slot.phase.as_str().to_string(),
            order_id: order.as_ref().map(|o| o.id.clone()),
            customer_name: order.as_ref().map(|o| o.customer_name.clone()),
            duration_hours: order.as_ref().map(|o| o.duration_hours),
            started_at: order.as_ref().map(|o| o.created_at),
            ends_at: slot.ends_at,
            remaining_seconds: slot.remaining_seconds,
        }
    }
}
