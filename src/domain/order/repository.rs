//! Order repository interface
//!
//! Operations that touch more than one table (order, lines, stock, pool
//! table status) are atomic at the storage level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Order, OrderDetails, OrderLine};
use crate::domain::DomainResult;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert the order and its lines, debit stock and mark the table
    /// unavailable. Fails with `Conflict` if stock ran out meanwhile.
    async fn place(&self, order: &Order, lines: &[OrderLine]) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Order>>;
    async fn find_details(&self, id: &str) -> DomainResult<Option<OrderDetails>>;

    /// Orders created in `[from, until)`, newest first
    async fn find_details_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<OrderDetails>>;

    /// Every order, oldest first
    async fn find_all_details(&self) -> DomainResult<Vec<OrderDetails>>;

    /// Orders whose table has not been released
    async fn find_running(&self) -> DomainResult<Vec<Order>>;
    async fn has_running_for_table(&self, pool_table_id: &str) -> DomainResult<bool>;

    /// Mark the order timed out and free its table. Returns `false` when
    /// the order was already released.
    async fn release(
        &self,
        order_id: &str,
        paused_at: Option<DateTime<Utc>>,
    ) -> DomainResult<bool>;

    /// Add `hours` to a running order, keeping the total within `max_hours`.
    /// Returns `false` when the order was released meanwhile or the cap
    /// would be exceeded.
    async fn extend(&self, order_id: &str, hours: i32, max_hours: i32) -> DomainResult<bool>;

    /// Mark an unpaid order paid. Returns `false` when it was already paid.
    async fn mark_paid(&self, order_id: &str, note: Option<&str>) -> DomainResult<bool>;

    /// Swap all F&B lines, returning old quantities to stock first.
    /// Fails with `Conflict` once the order is paid.
    async fn replace_lines(&self, order_id: &str, lines: &[OrderLine]) -> DomainResult<()>;
}
