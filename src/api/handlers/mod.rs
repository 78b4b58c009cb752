//! API Handlers

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod menu_items;
pub mod metrics;
pub mod orders;
pub mod pool_tables;
pub mod users;
