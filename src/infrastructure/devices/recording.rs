//! In-memory controller that remembers every command

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DevicePower, DomainError, DomainResult, TableDeviceController};

#[derive(Debug, Default)]
pub struct RecordingDeviceController {
    commands: Mutex<Vec<(String, DevicePower)>>,
    fail: bool,
}

impl RecordingDeviceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records commands but reports every one as failed
    pub fn failing() -> Self {
        Self {
            commands: Mutex::default(),
            fail: true,
        }
    }

    pub async fn commands(&self) -> Vec<(String, DevicePower)> {
        self.commands.lock().await.clone()
    }

    pub async fn last(&self) -> Option<(String, DevicePower)> {
        self.commands.lock().await.last().cloned()
    }
}

#[async_trait]
impl TableDeviceController for RecordingDeviceController {
    async fn switch(&self, device_id: &str, power: DevicePower) -> DomainResult<()> {
        self.commands
            .lock()
            .await
            .push((device_id.to_string(), power));
        if self.fail {
            return Err(DomainError::Device("broker unreachable".into()));
        }
        Ok(())
    }
}
