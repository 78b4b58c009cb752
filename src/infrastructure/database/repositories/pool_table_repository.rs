//! SeaORM implementation of PoolTableRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::{DomainError, DomainResult, PoolTable, PoolTableRepository, TableStatus};
use crate::infrastructure::database::entities::pool_table;

pub struct SeaOrmPoolTableRepository {
    db: DatabaseConnection,
}

impl SeaOrmPoolTableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn status_to_entity(status: TableStatus) -> pool_table::TableStatus {
    match status {
        TableStatus::Available => pool_table::TableStatus::Available,
        TableStatus::Unavailable => pool_table::TableStatus::Unavailable,
    }
}

fn status_to_domain(status: pool_table::TableStatus) -> TableStatus {
    match status {
        pool_table::TableStatus::Available => TableStatus::Available,
        pool_table::TableStatus::Unavailable => TableStatus::Unavailable,
    }
}

fn model_to_domain(model: pool_table::Model) -> PoolTable {
    PoolTable {
        id: model.id,
        name: model.name,
        price: model.price,
        device_id: model.device_id,
        status: status_to_domain(model.status),
        active: model.active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn device_conflict(e: sea_orm::DbErr) -> DomainError {
    match DomainError::from(e) {
        DomainError::Conflict(_) => DomainError::Conflict("Device ID already registered".into()),
        other => other,
    }
}

#[async_trait]
impl PoolTableRepository for SeaOrmPoolTableRepository {
    async fn save(&self, table: PoolTable) -> DomainResult<()> {
        debug!("Saving pool table: {} (device {})", table.name, table.device_id);
        let model = pool_table::ActiveModel {
            id: Set(table.id),
            name: Set(table.name),
            price: Set(table.price),
            device_id: Set(table.device_id),
            status: Set(status_to_entity(table.status)),
            active: Set(table.active),
            created_at: Set(table.created_at),
            updated_at: Set(table.updated_at),
        };
        model.insert(&self.db).await.map_err(device_conflict)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<PoolTable>> {
        let model = pool_table::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_device_id(&self, device_id: &str) -> DomainResult<Option<PoolTable>> {
        let model = pool_table::Entity::find()
            .filter(pool_table::Column::DeviceId.eq(device_id))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<PoolTable>> {
        let models = pool_table::Entity::find()
            .order_by_asc(pool_table::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_active(&self) -> DomainResult<Vec<PoolTable>> {
        let models = pool_table::Entity::find()
            .filter(pool_table::Column::Active.eq(true))
            .order_by_asc(pool_table::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, table: PoolTable) -> DomainResult<()> {
        debug!("Updating pool table: {}", table.id);
        let existing = pool_table::Entity::find_by_id(&table.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("PoolTable", &table.id))?;

        let mut active: pool_table::ActiveModel = existing.into();
        active.name = Set(table.name);
        active.price = Set(table.price);
        active.device_id = Set(table.device_id);
        active.status = Set(status_to_entity(table.status));
        active.active = Set(table.active);
        active.updated_at = Set(table.updated_at);
        active.update(&self.db).await.map_err(device_conflict)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = pool_table::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("PoolTable", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};

    async fn repo() -> SeaOrmPoolTableRepository {
        let db = init_and_migrate(&DatabaseConfig::in_memory()).await.unwrap();
        SeaOrmPoolTableRepository::new(db)
    }

    #[tokio::test]
    async fn device_id_is_unique() {
        let repo = repo().await;
        repo.save(PoolTable::new("Meja 1", 25_000, "1")).await.unwrap();
        let err = repo
            .save(PoolTable::new("Meja 2", 25_000, "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ref m) if m == "Device ID already registered"));
    }

    #[tokio::test]
    async fn find_active_skips_disabled_tables() {
        let repo = repo().await;
        let mut off = PoolTable::new("Meja 9", 20_000, "9");
        off.active = false;
        repo.save(PoolTable::new("Meja 1", 25_000, "1")).await.unwrap();
        repo.save(off).await.unwrap();

        let active = repo.find_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].device_id, "1");
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let repo = repo().await;
        let err = repo.delete("nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
