//! # Billiard POS
//!
//! Point-of-sale and back-office for a billiard café: table rental
//! timers, food & beverage stock, order billing and revenue reports.
//! Table lamps are switched over MQTT.
//!
//! ## Architecture
//!
//! - **domain**: Entities, pure rules and repository/device ports
//! - **application**: Use-case services and the session timer
//! - **infrastructure**: SQLite via SeaORM, MQTT device control
//! - **api**: REST API with Swagger documentation
//! - **auth**: JWT authentication and password hashing
//! - **notifications**: Real-time WebSocket notifications for floor screens

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod notifications;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_and_migrate, init_database, DatabaseConfig};

pub use api::{create_api_router, ApiState};

pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};

pub use server::{build_api_state, ServerHandle, ServerOptions};
