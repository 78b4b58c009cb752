//! Shared fixtures for service tests

use std::sync::Arc;

use crate::domain::{
    MenuCategory, MenuItem, PoolTable, RepositoryProvider,
};
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::{init_and_migrate, DatabaseConfig};

pub async fn repositories() -> Arc<dyn RepositoryProvider> {
    let db = init_and_migrate(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    Arc::new(SeaOrmRepositoryProvider::new(db))
}

pub async fn seed_table(repos: &Arc<dyn RepositoryProvider>, name: &str, device_id: &str) -> PoolTable {
    let table = PoolTable::new(name, 25_000, device_id);
    repos.pool_tables().save(table.clone()).await.expect("seed table");
    table
}

pub async fn seed_item(repos: &Arc<dyn RepositoryProvider>, name: &str, price: i64, stock: i32) -> MenuItem {
    let item = MenuItem::new(name, price, stock, MenuCategory::Beverage);
    repos.menu_items().save(item.clone()).await.expect("seed item");
    item
}
