//! Domain layer: venue entities, pure rules and repository ports.

pub mod dashboard;
pub mod menu;
pub mod order;
pub mod pool_table;
pub mod ports;
pub mod repositories;
pub mod user;

pub use dashboard::{MonthlySummary, RangeTotals};
pub use menu::{MenuCategory, MenuItem, MenuItemRepository, MAX_MENU_PRICE, MAX_STOCK};
pub use order::{
    merge_lines, Order, OrderDetails, OrderLine, OrderLineDetails, OrderRepository, TablePhase,
    MAX_LINE_QUANTITY, MAX_SESSION_HOURS,
};
pub use pool_table::{PoolTable, PoolTableRepository, TableStatus, MAX_TABLE_PRICE};
pub use ports::{DevicePower, TableDeviceController};
pub use repositories::RepositoryProvider;
pub use user::{User, UserRepository, UserRole};

pub use crate::support::errors::{DomainError, DomainResult};
