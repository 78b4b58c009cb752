//! Pool table administration and the live floor view

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::info;

use crate::domain::{
    DomainError, DomainResult, Order, PoolTable, RepositoryProvider, TablePhase, TableStatus,
    MAX_TABLE_PRICE,
};

/// Fields an admin may set on a table
#[derive(Debug, Clone)]
pub struct PoolTableInput {
    pub name: String,
    pub price: i64,
    pub device_id: String,
    pub status: Option<TableStatus>,
    pub active: Option<bool>,
}

/// One tile on the floor screen
#[derive(Debug, Clone)]
pub struct TableSlot {
    pub table: PoolTable,
    pub order: Option<Order>,
    pub phase: TablePhase,
    pub ends_at: Option<DateTime<Utc>>,
    pub remaining_seconds: Option<i64>,
}

fn check_price(price: i64) -> DomainResult<()> {
    if (1..=MAX_TABLE_PRICE).contains(&price) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Price must be between 1 and {}",
            MAX_TABLE_PRICE
        )))
    }
}

pub struct PoolTableService {
    repos: Arc<dyn RepositoryProvider>,
    ending_soon: Duration,
}

impl PoolTableService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, ending_soon: Duration) -> Self {
        Self { repos, ending_soon }
    }

    pub async fn create(&self, input: PoolTableInput) -> DomainResult<PoolTable> {
        check_price(input.price)?;
        let device_id = input.device_id.trim().to_string();
        if self.repos.pool_tables().find_by_device_id(&device_id).await?.is_some() {
            return Err(DomainError::Conflict("Device ID already registered".into()));
        }

        let mut table = PoolTable::new(input.name.trim(), input.price, device_id);
        table.status = input.status.unwrap_or_default();
        table.active = input.active.unwrap_or(true);
        self.repos.pool_tables().save(table.clone()).await?;
        info!("Pool table created: {} (device {})", table.name, table.device_id);
        Ok(table)
    }

    pub async fn update(&self, id: &str, input: PoolTableInput) -> DomainResult<PoolTable> {
        check_price(input.price)?;
        let mut table = self.get(id).await?;

        let device_id = input.device_id.trim().to_string();
        if device_id != table.device_id {
            if let Some(other) = self.repos.pool_tables().find_by_device_id(&device_id).await? {
                if other.id != table.id {
                    return Err(DomainError::Conflict("Device ID already registered".into()));
                }
            }
        }

        if let Some(status) = input.status {
            // Status follows the order lifecycle while a session is running
            if status != table.status && self.repos.orders().has_running_for_table(id).await? {
                return Err(DomainError::Conflict("Table has a running order".into()));
            }
            table.status = status;
        }

        table.name = input.name.trim().to_string();
        table.price = input.price;
        table.device_id = device_id;
        if let Some(active) = input.active {
            table.active = active;
        }
        table.updated_at = Utc::now();
        self.repos.pool_tables().update(table.clone()).await?;
        Ok(table)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.get(id).await?;
        if self.repos.orders().has_running_for_table(id).await? {
            return Err(DomainError::Conflict("Table has a running order".into()));
        }
        self.repos.pool_tables().delete(id).await?;
        info!("Pool table deleted: {}", id);
        Ok(())
    }

    pub async fn get(&self, id: &str) -> DomainResult<PoolTable> {
        self.repos
            .pool_tables()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", id))
    }

    pub async fn list(&self) -> DomainResult<Vec<PoolTable>> {
        self.repos.pool_tables().find_all().await
    }

    /// Active tables with their running order and countdown at `now`
    pub async fn floor(&self, now: DateTime<Utc>) -> DomainResult<Vec<TableSlot>> {
        let tables = self.repos.pool_tables().find_active().await?;
        let mut running: HashMap<String, Order> = self
            .repos
            .orders()
            .find_running()
            .await?
            .into_iter()
            .map(|order| (order.pool_table_id.clone(), order))
            .collect();

        Ok(tables
            .into_iter()
            .map(|table| {
                let order = running.remove(&table.id);
                let phase = order
                    .as_ref()
                    .map_or(TablePhase::Idle, |o| o.phase(now, self.ending_soon));
                TableSlot {
                    ends_at: order.as_ref().map(Order::ends_at),
                    remaining_seconds: order.as_ref().map(|o| o.remaining(now).num_seconds()),
                    table,
                    order,
                    phase,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::repositories;

    fn input(name: &str, device: &str) -> PoolTableInput {
        PoolTableInput {
            name: name.into(),
            price: 30_000,
            device_id: device.into(),
            status: None,
            active: None,
        }
    }

    async fn service() -> (PoolTableService, Arc<dyn RepositoryProvider>) {
        let repos = repositories().await;
        (
            PoolTableService::new(repos.clone(), Duration::minutes(5)),
            repos,
        )
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let (svc, _) = service().await;
        let table = svc.create(input(" Meja VIP ", " 7 ")).await.unwrap();
        assert_eq!(table.name, "Meja VIP");
        assert_eq!(table.device_id, "7");
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.active);
    }

    #[tokio::test]
    async fn price_must_stay_in_range() {
        let (svc, _) = service().await;
        let mut pricey = input("Meja 1", "1");
        pricey.price = MAX_TABLE_PRICE + 1;
        assert!(matches!(
            svc.create(pricey).await.unwrap_err(),
            DomainError::Validation(_)
        ));

        let table = svc.create(input("Meja 1", "1")).await.unwrap();
        let mut free = input("Meja 1", "1");
        free.price = 0;
        assert!(matches!(
            svc.update(&table.id, free).await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn device_id_must_be_unique_on_create_and_update() {
        let (svc, _) = service().await;
        svc.create(input("Meja 1", "1")).await.unwrap();
        let second = svc.create(input("Meja 2", "2")).await.unwrap();

        let err = svc.create(input("Meja 3", "1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = svc.update(&second.id, input("Meja 2", "1")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn idle_table_can_be_held_and_released_by_hand() {
        let (svc, _) = service().await;
        let mut held = input("Meja 1", "1");
        held.status = Some(TableStatus::Unavailable);
        let table = svc.create(held).await.unwrap();
        assert_eq!(table.status, TableStatus::Unavailable);

        let mut open = input("Meja 1", "1");
        open.status = Some(TableStatus::Available);
        let table = svc.update(&table.id, open).await.unwrap();
        assert!(table.is_available());
    }

    #[tokio::test]
    async fn running_table_cannot_be_deleted() {
        let (svc, repos) = service().await;
        let table = svc.create(input("Meja 1", "1")).await.unwrap();
        let order = Order::new(&table.id, "Andi", 1, None);
        repos.orders().place(&order, &[]).await.unwrap();

        let err = svc.delete(&table.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Table has a running order"));

        let err = svc.delete("missing").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn unused_table_can_be_deleted() {
        let (svc, _) = service().await;
        let table = svc.create(input("Meja 1", "1")).await.unwrap();
        svc.delete(&table.id).await.unwrap();
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn floor_shows_running_orders_and_phase() {
        let (svc, repos) = service().await;
        let busy = svc.create(input("Meja 1", "1")).await.unwrap();
        svc.create(input("Meja 2", "2")).await.unwrap();
        let mut hidden = input("Gudang", "99");
        hidden.active = Some(false);
        svc.create(hidden).await.unwrap();

        let order = Order::new(&busy.id, "Andi", 1, None);
        repos.orders().place(&order, &[]).await.unwrap();

        let now = order.created_at + Duration::minutes(57);
        let floor = svc.floor(now).await.unwrap();
        assert_eq!(floor.len(), 2);

        let slot = floor.iter().find(|s| s.table.id == busy.id).unwrap();
        assert_eq!(slot.phase, TablePhase::EndingSoon);
        let remaining = slot.remaining_seconds.unwrap();
        assert!((179..=180).contains(&remaining));
        assert_eq!(slot.order.as_ref().unwrap().customer_name, "Andi");

        let idle = floor.iter().find(|s| s.table.id != busy.id).unwrap();
        assert_eq!(idle.phase, TablePhase::Idle);
        assert!(idle.order.is_none());
    }
}
