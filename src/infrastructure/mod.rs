//! Infrastructure layer - external concerns

pub mod database;
pub mod devices;

pub use database::{init_and_migrate, init_database, DatabaseConfig};
pub use devices::{LogOnlyDeviceController, MqttDeviceController, RecordingDeviceController};
