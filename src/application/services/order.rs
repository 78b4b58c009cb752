//! Order lifecycle: open a table, control its timer, adjust F&B, take payment.
//!
//! The database is authoritative. Device commands and notifications go out
//! after the write has committed; a failed lamp command is logged and does
//! not undo the order.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::{
    merge_lines, DevicePower, DomainError, DomainResult, MenuItem, Order, OrderDetails, OrderLine,
    RepositoryProvider, TableDeviceController, MAX_SESSION_HOURS,
};
use crate::notifications::{Event, OrderEvent, OrderReleasedEvent, SharedEventBus};
use crate::support::time::VenueClock;

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub pool_table_id: String,
    pub customer_name: String,
    pub duration_hours: i32,
    pub items: Vec<OrderLine>,
}

/// Why a table was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Stopped,
    Expired,
}

impl Release {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Expired => "expired",
        }
    }
}

pub struct OrderService {
    repos: Arc<dyn RepositoryProvider>,
    devices: Arc<dyn TableDeviceController>,
    events: SharedEventBus,
    clock: VenueClock,
}

fn validate_lines(lines: &[OrderLine]) -> DomainResult<Vec<OrderLine>> {
    if let Some(bad) = lines.iter().find(|line| line.quantity < 1) {
        return Err(DomainError::Validation(format!(
            "Quantity for item {} must be at least 1",
            bad.item_id
        )));
    }
    merge_lines(lines)
}

fn order_event(order: &Order) -> OrderEvent {
    OrderEvent {
        order_id: order.id.clone(),
        pool_table_id: order.pool_table_id.clone(),
        customer_name: order.customer_name.clone(),
        duration_hours: order.duration_hours,
        ends_at: order.ends_at(),
        paid: order.paid,
    }
}

impl OrderService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        devices: Arc<dyn TableDeviceController>,
        events: SharedEventBus,
        clock: VenueClock,
    ) -> Self {
        Self {
            repos,
            devices,
            events,
            clock,
        }
    }

    /// Load the requested items and check they exist and have stock.
    /// `held` is stock this order already owns and will give back first.
    async fn check_items(
        &self,
        lines: &[OrderLine],
        held: &HashMap<String, i32>,
        require_active: bool,
    ) -> DomainResult<()> {
        let ids: Vec<String> = lines.iter().map(|l| l.item_id.clone()).collect();
        let items: HashMap<String, MenuItem> = self
            .repos
            .menu_items()
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        for line in lines {
            let item = items
                .get(&line.item_id)
                .ok_or_else(|| DomainError::not_found("MenuItem", &line.item_id))?;
            let returned = held.get(&line.item_id).copied().unwrap_or(0);
            if require_active && !item.active && returned == 0 {
                return Err(DomainError::Conflict(format!(
                    "{} is not on the menu",
                    item.name
                )));
            }
            if i64::from(item.stock) + i64::from(returned) < i64::from(line.quantity) {
                return Err(DomainError::Conflict(format!(
                    "Insufficient stock for {}",
                    item.name
                )));
            }
        }
        Ok(())
    }

    async fn switch_device(&self, device_id: &str, power: DevicePower) {
        if let Err(e) = self.devices.switch(device_id, power).await {
            warn!(
                "Device {} did not receive {}: {}",
                device_id,
                power.as_str(),
                e
            );
        }
    }

    async fn find_order(&self, id: &str) -> DomainResult<Order> {
        self.repos
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))
    }

    pub async fn get(&self, id: &str) -> DomainResult<OrderDetails> {
        self.repos
            .orders()
            .find_details(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", id))
    }

    pub async fn create(
        &self,
        request: NewOrder,
        created_by: Option<String>,
    ) -> DomainResult<OrderDetails> {
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(DomainError::Validation("Customer name is required".into()));
        }
        if !(1..=MAX_SESSION_HOURS).contains(&request.duration_hours) {
            return Err(DomainError::Validation(format!(
                "Duration must be between 1 and {} hours",
                MAX_SESSION_HOURS
            )));
        }
        let lines = validate_lines(&request.items)?;

        let table = self
            .repos
            .pool_tables()
            .find_by_id(&request.pool_table_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", &request.pool_table_id))?;
        if !table.active {
            return Err(DomainError::Conflict("Table is not active".into()));
        }
        if !table.is_available() {
            return Err(DomainError::Conflict("Table is in use".into()));
        }
        self.check_items(&lines, &HashMap::new(), true).await?;

        let order = Order::new(
            &table.id,
            customer_name,
            request.duration_hours,
            created_by,
        );
        self.repos.orders().place(&order, &lines).await?;

        info!(
            "Order {} opened on {} for {} ({}h)",
            order.id, table.name, order.customer_name, order.duration_hours
        );
        metrics::counter!("orders_created_total").increment(1);

        self.switch_device(&table.device_id, DevicePower::On).await;
        self.events.publish(Event::OrderCreated(order_event(&order)));
        self.get(&order.id).await
    }

    async fn release(
        &self,
        order: &Order,
        paused_at: Option<DateTime<Utc>>,
        reason: Release,
    ) -> DomainResult<bool> {
        if !self.repos.orders().release(&order.id, paused_at).await? {
            return Ok(false);
        }

        let details = self.get(&order.id).await?;
        info!(
            "Order {} on {} released ({})",
            order.id,
            details.table_name,
            reason.as_str()
        );
        metrics::counter!("orders_released_total", "reason" => reason.as_str()).increment(1);

        self.switch_device(&details.device_id, DevicePower::Off).await;
        let event = OrderReleasedEvent {
            order_id: order.id.clone(),
            pool_table_id: order.pool_table_id.clone(),
            device_id: details.device_id,
            released_at: paused_at.unwrap_or_else(Utc::now),
        };
        self.events.publish(match reason {
            Release::Stopped => Event::OrderStopped(event),
            Release::Expired => Event::OrderExpired(event),
        });
        Ok(true)
    }

    /// Stop the timer early and free the table
    pub async fn stop(
        &self,
        id: &str,
        stop_at: Option<DateTime<Utc>>,
    ) -> DomainResult<OrderDetails> {
        let order = self.find_order(id).await?;
        if !order.is_running() {
            return Err(DomainError::Conflict("Order is not running".into()));
        }
        let at = stop_at.unwrap_or_else(Utc::now);
        if !self.release(&order, Some(at), Release::Stopped).await? {
            return Err(DomainError::Conflict("Order is not running".into()));
        }
        self.get(id).await
    }

    /// End a session whose time is up. Already-released orders are left as is.
    pub async fn expire(&self, id: &str) -> DomainResult<OrderDetails> {
        let order = self.find_order(id).await?;
        if order.is_running() {
            self.release(&order, None, Release::Expired).await?;
        }
        self.get(id).await
    }

    pub async fn extend(&self, id: &str, hours: i32) -> DomainResult<OrderDetails> {
        if hours < 1 {
            return Err(DomainError::Validation(
                "Extension must be at least 1 hour".into(),
            ));
        }
        let mut order = self.find_order(id).await?;
        if !order.is_running() {
            return Err(DomainError::Conflict("Order is not running".into()));
        }
        order.extend(hours)?;

        if !self
            .repos
            .orders()
            .extend(id, hours, MAX_SESSION_HOURS)
            .await?
        {
            // Lost a race with the timer, a stop or another extension
            let current = self.find_order(id).await?;
            if !current.is_running() {
                return Err(DomainError::Conflict("Order is not running".into()));
            }
            return Err(DomainError::Validation(format!(
                "A session cannot run longer than {} hours",
                MAX_SESSION_HOURS
            )));
        }

        let details = self.get(id).await?;
        info!("Order {} extended by {}h", id, hours);
        self.events
            .publish(Event::OrderExtended(order_event(&details.order)));
        Ok(details)
    }

    pub async fn replace_items(
        &self,
        id: &str,
        items: &[OrderLine],
    ) -> DomainResult<OrderDetails> {
        let current = self.get(id).await?;
        if current.order.paid {
            return Err(DomainError::Conflict("Order already paid".into()));
        }
        let lines = validate_lines(items)?;

        let held: HashMap<String, i32> = current
            .lines
            .iter()
            .map(|line| (line.item_id.clone(), line.quantity))
            .collect();
        self.check_items(&lines, &held, true).await?;

        self.repos.orders().replace_lines(id, &lines).await?;
        self.events
            .publish(Event::OrderItemsReplaced(order_event(&current.order)));
        self.get(id).await
    }

    pub async fn pay(&self, id: &str, note: Option<String>) -> DomainResult<OrderDetails> {
        let order = self.find_order(id).await?;
        if order.paid {
            return Err(DomainError::Conflict("Order already paid".into()));
        }
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if !self.repos.orders().mark_paid(id, note.as_deref()).await? {
            return Err(DomainError::Conflict("Order already paid".into()));
        }

        let details = self.get(id).await?;
        info!("Order {} paid", id);
        self.events.publish(Event::OrderPaid(order_event(&details.order)));
        Ok(details)
    }

    /// Orders opened on one venue-local day, newest first. Today when `date`
    /// is missing or unreadable.
    pub async fn list_by_day(
        &self,
        date: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<OrderDetails>> {
        let day = self
            .clock
            .parse_date(date)
            .unwrap_or_else(|| self.clock.today(now));
        let (from, until) = self
            .clock
            .day_bounds(day)
            .ok_or_else(|| DomainError::Validation("Date is out of range".into()))?;
        self.repos.orders().find_details_between(from, until).await
    }

    /// Orders whose paid time has run out but which still hold their table
    pub async fn find_overdue(&self, now: DateTime<Utc>) -> DomainResult<Vec<Order>> {
        Ok(self
            .repos
            .orders()
            .find_running()
            .await?
            .into_iter()
            .filter(|order| order.is_expired(now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{repositories, seed_item, seed_table};
    use crate::domain::{PoolTable, TableStatus};
    use crate::infrastructure::RecordingDeviceController;
    use crate::notifications::create_event_bus;

    struct Fixture {
        svc: OrderService,
        repos: Arc<dyn RepositoryProvider>,
        devices: Arc<RecordingDeviceController>,
        bus: SharedEventBus,
        table: PoolTable,
    }

    async fn fixture_with(devices: RecordingDeviceController) -> Fixture {
        let repos = repositories().await;
        let devices = Arc::new(devices);
        let bus = create_event_bus();
        let table = seed_table(&repos, "Meja 1", "3").await;
        Fixture {
            svc: OrderService::new(
                repos.clone(),
                devices.clone(),
                bus.clone(),
                VenueClock::default(),
            ),
            repos,
            devices,
            bus,
            table,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(RecordingDeviceController::new()).await
    }

    fn request(table: &PoolTable, items: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            pool_table_id: table.id.clone(),
            customer_name: "Andi".into(),
            duration_hours: 2,
            items,
        }
    }

    #[tokio::test]
    async fn create_merges_lines_and_turns_device_on() {
        let f = fixture().await;
        let kopi = seed_item(&f.repos, "Kopi", 8_000, 10).await;
        let mut events = f.bus.subscribe();

        let details = f
            .svc
            .create(
                request(
                    &f.table,
                    vec![OrderLine::new(&kopi.id, 1), OrderLine::new(&kopi.id, 2)],
                ),
                None,
            )
            .await
            .unwrap();
        assert_eq!(details.lines.len(), 1);
        assert_eq!(details.lines[0].quantity, 3);
        assert_eq!(details.total(), 2 * 25_000 + 3 * 8_000);

        let table = f.repos.pool_tables().find_by_id(&f.table.id).await.unwrap().unwrap();
        assert_eq!(table.status, TableStatus::Unavailable);
        assert_eq!(
            f.devices.commands().await,
            vec![("3".to_string(), DevicePower::On)]
        );
        let event = events.recv().await.unwrap();
        assert_eq!(event.event.event_type(), "order_created");
    }

    #[tokio::test]
    async fn create_rejects_busy_table_and_short_stock() {
        let f = fixture().await;
        let kopi = seed_item(&f.repos, "Kopi", 8_000, 1).await;

        let err = f
            .svc
            .create(request(&f.table, vec![OrderLine::new(&kopi.id, 2)]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Insufficient stock for Kopi"));

        f.svc.create(request(&f.table, vec![]), None).await.unwrap();
        let err = f
            .svc
            .create(request(&f.table, vec![]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Table is in use"));

        let mut missing = request(&f.table, vec![]);
        missing.pool_table_id = "nope".into();
        let err = f.svc.create(missing, None).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Table", .. }));
    }

    #[tokio::test]
    async fn held_table_cannot_open_an_order() {
        let f = fixture().await;
        let mut held = f.table.clone();
        held.status = TableStatus::Unavailable;
        f.repos.pool_tables().update(held).await.unwrap();

        let err = f
            .svc
            .create(request(&f.table, vec![]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Table is in use"));
        assert!(f.repos.orders().find_running().await.unwrap().is_empty());
        assert!(f.devices.commands().await.is_empty());
    }

    #[tokio::test]
    async fn create_validates_input() {
        let f = fixture().await;
        let mut blank = request(&f.table, vec![]);
        blank.customer_name = "  ".into();
        assert!(matches!(
            f.svc.create(blank, None).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let zero = request(&f.table, vec![OrderLine::new("x", 0)]);
        assert!(matches!(
            f.svc.create(zero, None).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn stop_frees_table_and_turns_device_off() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();
        let stop_at = Utc::now();

        let stopped = f.svc.stop(&order.order.id, Some(stop_at)).await.unwrap();
        assert!(stopped.order.time_out);
        assert!(stopped.order.paused_at.is_some());
        assert_eq!(f.devices.last().await, Some(("3".to_string(), DevicePower::Off)));

        let err = f.svc.stop(&order.order.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn expire_is_idempotent() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();

        let first = f.svc.expire(&order.order.id).await.unwrap();
        assert!(first.order.time_out);
        assert!(first.order.paused_at.is_none());
        let second = f.svc.expire(&order.order.id).await.unwrap();
        assert!(second.order.time_out);

        // ON once, OFF once
        assert_eq!(f.devices.commands().await.len(), 2);
    }

    #[tokio::test]
    async fn device_failure_does_not_fail_the_order() {
        let f = fixture_with(RecordingDeviceController::failing()).await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();
        assert!(order.order.is_running());
        f.svc.stop(&order.order.id, None).await.unwrap();
        assert_eq!(f.devices.commands().await.len(), 2);
    }

    #[tokio::test]
    async fn extend_only_while_running() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();

        let extended = f.svc.extend(&order.order.id, 1).await.unwrap();
        assert_eq!(extended.order.duration_hours, 3);

        assert!(matches!(
            f.svc.extend(&order.order.id, 0).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        f.svc.stop(&order.order.id, None).await.unwrap();
        assert!(matches!(
            f.svc.extend(&order.order.id, 1).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[tokio::test]
    async fn session_length_is_capped() {
        let f = fixture().await;
        let mut endless = request(&f.table, vec![]);
        endless.duration_hours = i32::MAX;
        assert!(matches!(
            f.svc.create(endless, None).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let mut week = request(&f.table, vec![]);
        week.duration_hours = MAX_SESSION_HOURS - 1;
        let order = f.svc.create(week, None).await.unwrap();
        assert!(matches!(
            f.svc.extend(&order.order.id, i32::MAX).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            f.svc.extend(&order.order.id, 2).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let extended = f.svc.extend(&order.order.id, 1).await.unwrap();
        assert_eq!(extended.order.duration_hours, MAX_SESSION_HOURS);
        assert!(extended.total() > 0);
    }

    #[tokio::test]
    async fn oversized_quantities_are_rejected_before_saving() {
        let f = fixture().await;
        let kopi = seed_item(&f.repos, "Kopi", 8_000, 10).await;
        let huge = request(
            &f.table,
            vec![
                OrderLine::new(&kopi.id, i32::MAX),
                OrderLine::new(&kopi.id, i32::MAX),
            ],
        );
        assert!(matches!(
            f.svc.create(huge, None).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(f.repos.orders().find_running().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_items_reuses_held_stock() {
        let f = fixture().await;
        let kopi = seed_item(&f.repos, "Kopi", 8_000, 3).await;
        let order = f
            .svc
            .create(request(&f.table, vec![OrderLine::new(&kopi.id, 3)]), None)
            .await
            .unwrap();

        // All three are held by this order, so asking for three again fits
        let replaced = f
            .svc
            .replace_items(&order.order.id, &[OrderLine::new(&kopi.id, 3)])
            .await
            .unwrap();
        assert_eq!(replaced.lines[0].quantity, 3);

        let err = f
            .svc
            .replace_items(&order.order.id, &[OrderLine::new(&kopi.id, 4)])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let emptied = f.svc.replace_items(&order.order.id, &[]).await.unwrap();
        assert!(emptied.lines.is_empty());
        let stock = f.repos.menu_items().find_by_id(&kopi.id).await.unwrap().unwrap().stock;
        assert_eq!(stock, 3);
    }

    #[tokio::test]
    async fn pay_once() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();

        let paid = f
            .svc
            .pay(&order.order.id, Some("QRIS".into()))
            .await
            .unwrap();
        assert!(paid.order.paid);
        assert_eq!(paid.order.note.as_deref(), Some("QRIS"));

        let err = f.svc.pay(&order.order.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Order already paid"));

        let err = f
            .svc
            .replace_items(&order.order.id, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn simultaneous_payments_settle_once() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();
        let id = order.order.id.as_str();

        let (first, second) = tokio::join!(
            f.svc.pay(id, Some("cash".into())),
            f.svc.pay(id, Some("QRIS".into()))
        );
        let winner = match (first, second) {
            (Ok(paid), Err(DomainError::Conflict(_))) | (Err(DomainError::Conflict(_)), Ok(paid)) => {
                paid
            }
            other => panic!("expected exactly one payment to succeed, got {:?}", other),
        };

        let stored = f.svc.get(id).await.unwrap();
        assert!(stored.order.paid);
        assert_eq!(stored.order.note, winner.order.note);
    }

    #[tokio::test]
    async fn extend_after_release_conflicts() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();
        // The timer frees the table behind the service's back
        f.repos.orders().release(&order.order.id, None).await.unwrap();

        assert!(matches!(
            f.svc.extend(&order.order.id, 1).await.unwrap_err(),
            DomainError::Conflict(_)
        ));
        assert_eq!(f.svc.get(&order.order.id).await.unwrap().order.duration_hours, 2);
    }

    #[tokio::test]
    async fn list_by_day_uses_venue_day() {
        let f = fixture().await;
        let order = f.svc.create(request(&f.table, vec![]), None).await.unwrap();
        let now = order.order.created_at;

        let today = f.svc.list_by_day(None, now).await.unwrap();
        assert_eq!(today.len(), 1);

        let long_ago = f.svc.list_by_day(Some("2001-01-01"), now).await.unwrap();
        assert!(long_ago.is_empty());

        let garbage = f.svc.list_by_day(Some("kemarin"), now).await.unwrap();
        assert_eq!(garbage.len(), 1);

        let edge_of_time = f.svc.list_by_day(Some("-262143-01-01"), now).await.unwrap();
        assert_eq!(edge_of_time.len(), 1);
    }
}
