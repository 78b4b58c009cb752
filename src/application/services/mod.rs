//! Application services

mod dashboard;
mod identity;
mod menu;
mod order;
mod pool_table;
mod session_timer;

#[cfg(test)]
pub(crate) mod test_support;

pub use dashboard::{DashboardService, RangeReport};
pub use identity::{AuthResult, IdentityService};
pub use menu::{MenuItemInput, MenuService};
pub use order::{NewOrder, OrderService};
pub use pool_table::{PoolTableInput, PoolTableService, TableSlot};
pub use session_timer::{SessionTimer, SessionTimerConfig};
