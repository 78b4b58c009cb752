//! Menu item repository interface

use async_trait::async_trait;

use super::model::MenuItem;
use crate::domain::DomainResult;

#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    async fn save(&self, item: MenuItem) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<MenuItem>>;
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<MenuItem>>;
    /// Every item, oldest first
    async fn find_all(&self) -> DomainResult<Vec<MenuItem>>;
    /// Active items with stock left, oldest first
    async fn find_sellable(&self) -> DomainResult<Vec<MenuItem>>;
    async fn update(&self, item: MenuItem) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
    /// Whether any order line points at the item
    async fn is_referenced(&self, id: &str) -> DomainResult<bool>;
}
