//! Database entities module

pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod pool_table;
pub mod user;

pub use menu_item::Entity as MenuItem;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use pool_table::Entity as PoolTable;
pub use user::Entity as User;
