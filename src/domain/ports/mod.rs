//! Outbound ports

pub mod device;

pub use device::{DevicePower, TableDeviceController};
