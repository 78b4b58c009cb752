//! Application layer: use cases over the domain ports

pub mod services;

pub use services::{
    AuthResult, DashboardService, IdentityService, MenuItemInput, MenuService, NewOrder,
    OrderService, PoolTableInput, PoolTableService, RangeReport, SessionTimer, SessionTimerConfig,
    TableSlot,
};
