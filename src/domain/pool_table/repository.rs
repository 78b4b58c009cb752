//! Pool table repository interface

use async_trait::async_trait;

use super::model::PoolTable;
use crate::domain::DomainResult;

#[async_trait]
pub trait PoolTableRepository: Send + Sync {
    async fn save(&self, table: PoolTable) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<PoolTable>>;
    async fn find_by_device_id(&self, device_id: &str) -> DomainResult<Option<PoolTable>>;
    /// All tables, oldest first
    async fn find_all(&self) -> DomainResult<Vec<PoolTable>>;
    /// Active tables, oldest first
    async fn find_active(&self) -> DomainResult<Vec<PoolTable>>;
    async fn update(&self, table: PoolTable) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
