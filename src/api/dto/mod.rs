//! Request and response bodies of the REST API

pub mod auth;
pub mod common;
pub mod dashboard;
pub mod menu;
pub mod order;
pub mod pool_table;

pub use auth::*;
pub use common::*;
pub use dashboard::*;
pub use menu::*;
pub use order::*;
pub use pool_table::*;
