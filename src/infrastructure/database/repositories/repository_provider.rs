//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    MenuItemRepository, OrderRepository, PoolTableRepository, RepositoryProvider, UserRepository,
};

use super::menu_repository::SeaOrmMenuItemRepository;
use super::order_repository::SeaOrmOrderRepository;
use super::pool_table_repository::SeaOrmPoolTableRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    pool_tables: SeaOrmPoolTableRepository,
    menu_items: SeaOrmMenuItemRepository,
    orders: SeaOrmOrderRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            pool_tables: SeaOrmPoolTableRepository::new(db.clone()),
            menu_items: SeaOrmMenuItemRepository::new(db.clone()),
            orders: SeaOrmOrderRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn pool_tables(&self) -> &dyn PoolTableRepository {
        &self.pool_tables
    }

    fn menu_items(&self) -> &dyn MenuItemRepository {
        &self.menu_items
    }

    fn orders(&self) -> &dyn OrderRepository {
        &self.orders
    }
}
