//! Table device adapters
//!
//! `MqttDeviceController` drives the real lamps. The other two stand in
//! when MQTT is disabled and in tests.

mod mqtt;
mod noop;
mod recording;

pub use mqtt::{payload, MqttDeviceController};
pub use noop::LogOnlyDeviceController;
pub use recording::RecordingDeviceController;
