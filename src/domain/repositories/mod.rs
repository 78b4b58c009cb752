//! Unified access to the per-aggregate repositories

use super::menu::MenuItemRepository;
use super::order::OrderRepository;
use super::pool_table::PoolTableRepository;
use super::user::UserRepository;

/// Consumers ask for only the repository they need:
///
/// ```ignore
/// let table = repos.pool_tables().find_by_id(&id).await?;
/// let running = repos.orders().find_running().await?;
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn pool_tables(&self) -> &dyn PoolTableRepository;
    fn menu_items(&self) -> &dyn MenuItemRepository;
    fn orders(&self) -> &dyn OrderRepository;
}
