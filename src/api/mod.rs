//! REST API
//!
//! HTTP endpoints for the floor (tables, orders, timers), the F&B
//! catalogue, staff accounts and the revenue dashboard.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiState};
