//! Controller used when MQTT is disabled

use async_trait::async_trait;
use log::info;

use super::payload;
use crate::domain::{DevicePower, DomainResult, TableDeviceController};

#[derive(Debug, Default, Clone)]
pub struct LogOnlyDeviceController;

#[async_trait]
impl TableDeviceController for LogOnlyDeviceController {
    async fn switch(&self, device_id: &str, power: DevicePower) -> DomainResult<()> {
        info!("MQTT disabled, skipping {}", payload(device_id, power));
        metrics::counter!("device_commands_total", "power" => power.as_str(), "outcome" => "skipped")
            .increment(1);
        Ok(())
    }
}
