//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_pool_tables;
mod m20240101_000003_create_menu_items;
mod m20240101_000004_create_orders;
mod m20240101_000005_create_order_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_pool_tables::Migration),
            Box::new(m20240101_000003_create_menu_items::Migration),
            Box::new(m20240101_000004_create_orders::Migration),
            Box::new(m20240101_000005_create_order_items::Migration),
        ]
    }
}
