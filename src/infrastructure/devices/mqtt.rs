//! MQTT adapter for `TableDeviceController`
//!
//! Publishes `meja<device_id>_on` / `meja<device_id>_off` to the lamp topic.
//! A background task owns the rumqttc event loop; it reconnects after a
//! fixed back-off until shutdown.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, Transport};

use crate::config::{MqttConfig, MqttTransport};
use crate::domain::{DevicePower, DomainError, DomainResult, TableDeviceController};
use crate::support::shutdown::ShutdownSignal;

const RECONNECT_BACKOFF: Duration = Duration::from_secs(5);
const REQUEST_QUEUE: usize = 64;

/// Wire payload understood by the table firmware
pub fn payload(device_id: &str, power: DevicePower) -> String {
    format!("meja{}_{}", device_id, power.as_str())
}

fn mqtt_options(config: &MqttConfig) -> MqttOptions {
    let mut options = match config.transport {
        MqttTransport::Tcp => MqttOptions::new(&config.client_id, &config.host, config.port),
        MqttTransport::Ws => {
            let url = format!("ws://{}:{}/mqtt", config.host, config.port);
            let mut options = MqttOptions::new(&config.client_id, url, config.port);
            options.set_transport(Transport::Ws);
            options
        }
    };
    options.set_keep_alive(Duration::from_secs(config.keep_alive_secs.max(5)));
    options
}

pub struct MqttDeviceController {
    client: AsyncClient,
    topic: String,
}

impl MqttDeviceController {
    /// Create the client and spawn its event loop
    pub fn start(config: &MqttConfig, shutdown: ShutdownSignal) -> Self {
        let (client, eventloop) = AsyncClient::new(mqtt_options(config), REQUEST_QUEUE);
        info!(
            "💡 MQTT device controller targeting {}:{} (topic {})",
            config.host, config.port, config.topic
        );
        tokio::spawn(drive_event_loop(eventloop, shutdown));
        Self {
            client,
            topic: config.topic.clone(),
        }
    }
}

async fn drive_event_loop(mut eventloop: EventLoop, shutdown: ShutdownSignal) {
    let stop = shutdown.wait();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => info!("💡 MQTT connected"),
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        "MQTT connection error: {}. Reconnecting in {}s",
                        e,
                        RECONNECT_BACKOFF.as_secs()
                    );
                    tokio::select! {
                        _ = &mut stop => break,
                        _ = tokio::time::sleep(RECONNECT_BACKOFF) => {}
                    }
                }
            }
        }
    }

    info!("💡 MQTT event loop stopped");
}

#[async_trait]
impl TableDeviceController for MqttDeviceController {
    async fn switch(&self, device_id: &str, power: DevicePower) -> DomainResult<()> {
        let message = payload(device_id, power);
        // try_publish never blocks a request when the broker is away and the queue is full
        match self
            .client
            .try_publish(&self.topic, QoS::AtLeastOnce, false, message.clone().into_bytes())
        {
            Ok(()) => {
                debug!("Queued {} on {}", message, self.topic);
                metrics::counter!("device_commands_total", "power" => power.as_str(), "outcome" => "sent")
                    .increment(1);
                Ok(())
            }
            Err(e) => {
                metrics::counter!("device_commands_total", "power" => power.as_str(), "outcome" => "failed")
                    .increment(1);
                Err(DomainError::Device(format!(
                    "failed to publish {}: {}",
                    message, e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_firmware_format() {
        assert_eq!(payload("3", DevicePower::On), "meja3_on");
        assert_eq!(payload("12", DevicePower::Off), "meja12_off");
    }

    #[test]
    fn ws_transport_uses_url_broker() {
        let config = MqttConfig {
            transport: MqttTransport::Ws,
            host: "192.168.1.6".into(),
            port: 9001,
            ..MqttConfig::default()
        };
        let options = mqtt_options(&config);
        assert_eq!(options.broker_address().0, "ws://192.168.1.6:9001/mqtt");
        assert_eq!(options.keep_alive(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn switch_queues_without_a_broker() {
        let shutdown = ShutdownSignal::new();
        let controller = MqttDeviceController::start(&MqttConfig::default(), shutdown.clone());
        controller.switch("1", DevicePower::On).await.unwrap();
        shutdown.trigger();
    }
}
