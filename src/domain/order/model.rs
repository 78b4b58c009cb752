//! Order domain entity
//!
//! An order rents one table for a whole number of hours and may carry
//! F&B lines. It is *running* until `time_out` is set, either by staff
//! stopping the timer or by the session timer expiring it.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{DomainError, DomainResult};

/// Longest a single rental may run, extensions included
pub const MAX_SESSION_HOURS: i32 = 24 * 7;
/// Most units of one item on a single order
pub const MAX_LINE_QUANTITY: i32 = 10_000;

/// Where a table is in its rental countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    /// No running order
    Idle,
    Running,
    /// Little time left; the floor UI highlights the table
    EndingSoon,
    /// Paid time is used up but the table has not been released yet
    Expired,
}

impl TablePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::EndingSoon => "ending_soon",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub pool_table_id: String,
    pub customer_name: String,
    pub duration_hours: i32,
    pub paid: bool,
    pub note: Option<String>,
    /// Set once the table has been released
    pub time_out: bool,
    /// When staff stopped the timer early
    pub paused_at: Option<DateTime<Utc>>,
    /// User id of the cashier who opened the order
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        pool_table_id: impl Into<String>,
        customer_name: impl Into<String>,
        duration_hours: i32,
        created_by: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            pool_table_id: pool_table_id.into(),
            customer_name: customer_name.into(),
            duration_hours,
            paid: false,
            note: None,
            time_out: false,
            paused_at: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.time_out
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(self.duration_hours as i64)
    }

    /// Time left on the clock, never negative
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let left = self.ends_at() - now;
        if left < Duration::zero() {
            Duration::zero()
        } else {
            left
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ends_at() <= now
    }

    pub fn phase(&self, now: DateTime<Utc>, ending_soon: Duration) -> TablePhase {
        if !self.is_running() {
            return TablePhase::Idle;
        }
        let remaining = self.remaining(now);
        if remaining == Duration::zero() {
            TablePhase::Expired
        } else if remaining <= ending_soon {
            TablePhase::EndingSoon
        } else {
            TablePhase::Running
        }
    }

    /// Add paid time. The total stays within `MAX_SESSION_HOURS`.
    pub fn extend(&mut self, hours: i32) -> DomainResult<()> {
        let total = self
            .duration_hours
            .checked_add(hours)
            .filter(|total| *total <= MAX_SESSION_HOURS)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "A session cannot run longer than {} hours",
                    MAX_SESSION_HOURS
                ))
            })?;
        self.duration_hours = total;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// One requested F&B line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: i32,
}

impl OrderLine {
    pub fn new(item_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Collapse repeated items into one line each, summing quantities.
/// Output is sorted by item id so stock updates always lock in the same order.
pub fn merge_lines(lines: &[OrderLine]) -> DomainResult<Vec<OrderLine>> {
    let mut merged: BTreeMap<&str, i32> = BTreeMap::new();
    for line in lines {
        let quantity = merged.entry(line.item_id.as_str()).or_insert(0);
        *quantity = quantity
            .checked_add(line.quantity)
            .filter(|total| *total <= MAX_LINE_QUANTITY)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "Quantity for item {} must be at most {}",
                    line.item_id, MAX_LINE_QUANTITY
                ))
            })?;
    }
    Ok(merged
        .into_iter()
        .map(|(item_id, quantity)| OrderLine::new(item_id, quantity))
        .collect())
}

/// A line joined with the item it sells
#[derive(Debug, Clone)]
pub struct OrderLineDetails {
    pub item_id: String,
    pub name: String,
    pub price: i64,
    pub quantity: i32,
}

impl OrderLineDetails {
    pub fn subtotal(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Read model used by listings, receipts and the dashboard.
/// Money sums saturate so a bad row cannot take the listing down.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub table_name: String,
    pub table_price: i64,
    pub device_id: String,
    pub lines: Vec<OrderLineDetails>,
    pub creator_name: Option<String>,
    pub creator_email: Option<String>,
}

impl OrderDetails {
    pub fn table_cost(&self) -> i64 {
        self.table_price
            .saturating_mul(i64::from(self.order.duration_hours))
    }

    pub fn fnb_cost(&self) -> i64 {
        self.lines
            .iter()
            .map(OrderLineDetails::subtotal)
            .fold(0, i64::saturating_add)
    }

    pub fn total(&self) -> i64 {
        self.table_cost().saturating_add(self.fnb_cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order_at(hours: i32) -> Order {
        let mut order = Order::new("table-1", "Andi", hours, None);
        order.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        order
    }

    #[test]
    fn ends_at_adds_whole_hours() {
        let order = order_at(2);
        assert_eq!(order.ends_at(), Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let order = order_at(1);
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap();
        assert_eq!(order.remaining(later), Duration::zero());
        assert!(order.is_expired(later));
    }

    #[test]
    fn expiry_is_inclusive_of_end_instant() {
        let order = order_at(1);
        assert!(order.is_expired(order.ends_at()));
        assert!(!order.is_expired(order.ends_at() - Duration::seconds(1)));
    }

    #[test]
    fn phase_progression() {
        let order = order_at(1);
        let soon = Duration::minutes(5);
        let start = order.created_at;

        assert_eq!(order.phase(start, soon), TablePhase::Running);
        assert_eq!(
            order.phase(start + Duration::minutes(56), soon),
            TablePhase::EndingSoon
        );
        assert_eq!(
            order.phase(start + Duration::minutes(60), soon),
            TablePhase::Expired
        );

        let mut stopped = order.clone();
        stopped.time_out = true;
        assert_eq!(stopped.phase(start, soon), TablePhase::Idle);
    }

    #[test]
    fn extend_pushes_end_time() {
        let mut order = order_at(1);
        let before = order.ends_at();
        order.extend(2).unwrap();
        assert_eq!(order.duration_hours, 3);
        assert_eq!(order.ends_at() - before, Duration::hours(2));
    }

    #[test]
    fn extend_stops_at_the_session_cap() {
        let mut order = order_at(MAX_SESSION_HOURS);
        assert!(matches!(order.extend(1), Err(DomainError::Validation(_))));
        assert_eq!(order.duration_hours, MAX_SESSION_HOURS);

        let mut order = order_at(i32::MAX);
        assert!(matches!(order.extend(1), Err(DomainError::Validation(_))));
    }

    #[test]
    fn merge_lines_sums_duplicates() {
        let merged = merge_lines(&[
            OrderLine::new("b", 1),
            OrderLine::new("a", 2),
            OrderLine::new("b", 3),
        ])
        .unwrap();
        assert_eq!(merged, vec![OrderLine::new("a", 2), OrderLine::new("b", 4)]);
    }

    #[test]
    fn merge_lines_rejects_oversized_totals() {
        let err = merge_lines(&[
            OrderLine::new("a", MAX_LINE_QUANTITY),
            OrderLine::new("a", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = merge_lines(&[OrderLine::new("a", i32::MAX), OrderLine::new("a", i32::MAX)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn huge_prices_saturate_instead_of_overflowing() {
        let details = OrderDetails {
            order: order_at(2),
            table_name: "Meja 1".into(),
            table_price: i64::MAX / 2 + 1,
            device_id: "1".into(),
            lines: vec![OrderLineDetails {
                item_id: "x".into(),
                name: "Kopi".into(),
                price: i64::MAX,
                quantity: 3,
            }],
            creator_name: None,
            creator_email: None,
        };
        assert_eq!(details.table_cost(), i64::MAX);
        assert_eq!(details.fnb_cost(), i64::MAX);
        assert_eq!(details.total(), i64::MAX);
    }

    #[test]
    fn details_totals() {
        let details = OrderDetails {
            order: order_at(2),
            table_name: "Meja 1".into(),
            table_price: 25_000,
            device_id: "1".into(),
            lines: vec![
                OrderLineDetails {
                    item_id: "x".into(),
                    name: "Kopi".into(),
                    price: 8_000,
                    quantity: 2,
                },
                OrderLineDetails {
                    item_id: "y".into(),
                    name: "Mie Goreng".into(),
                    price: 15_000,
                    quantity: 1,
                },
            ],
            creator_name: None,
            creator_email: None,
        };
        assert_eq!(details.table_cost(), 50_000);
        assert_eq!(details.fnb_cost(), 31_000);
        assert_eq!(details.total(), 81_000);
    }
}
