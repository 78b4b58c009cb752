//! Table light/power device port

use async_trait::async_trait;

use crate::domain::DomainResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePower {
    On,
    Off,
}

impl DevicePower {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

/// Switches the physical device attached to a pool table.
///
/// Fire-and-forget: implementations report transport failures, but the
/// caller treats the database as the source of truth.
#[async_trait]
pub trait TableDeviceController: Send + Sync {
    async fn switch(&self, device_id: &str, power: DevicePower) -> DomainResult<()>;
}
