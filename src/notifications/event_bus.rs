//! In-process fan-out of order events to connected floor screens.
//!
//! A screen that falls more than a channel's worth behind skips ahead to
//! the oldest event still buffered.

use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::broadcast::{self, error::RecvError};

use super::events::{Event, EventMessage};

const CHANNEL_CAPACITY: usize = 256;

pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Stamp and deliver to every screen listening right now.
    /// Returns how many received it.
    pub fn publish(&self, event: Event) -> usize {
        let message = EventMessage::new(event);
        let kind = message.event.event_type();
        let table = message.event.pool_table_id().to_string();

        let screens = self.sender.send(message).unwrap_or(0);
        debug!("{} on table {} sent to {} screen(s)", kind, table, screens);
        screens
    }

    pub fn subscribe(&self) -> EventSubscriber {
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }

    /// Screens currently subscribed
    pub fn listeners(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<EventMessage>,
}

impl EventSubscriber {
    /// `None` once the bus is gone
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(missed)) => {
                    warn!("Floor screen fell behind, skipped {} events", missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::OrderEvent;
    use chrono::Utc;

    fn paid(order_id: &str) -> Event {
        Event::OrderPaid(OrderEvent {
            order_id: order_id.to_string(),
            pool_table_id: "t-1".to_string(),
            customer_name: "Andi".to_string(),
            duration_hours: 1,
            ends_at: Utc::now(),
            paid: true,
        })
    }

    #[tokio::test]
    async fn screens_receive_published_events() {
        let bus = EventBus::new();
        let mut screen = bus.subscribe();

        assert_eq!(bus.publish(paid("o-9")), 1);

        let received = screen.recv().await.unwrap();
        assert_eq!(received.event.event_type(), "order_paid");
        assert_eq!(received.event.order_id(), "o-9");
    }

    #[test]
    fn listeners_follow_subscriptions() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(paid("o-1")), 0);
        assert_eq!(bus.listeners(), 0);

        let screen = bus.subscribe();
        assert_eq!(bus.listeners(), 1);
        drop(screen);
        assert_eq!(bus.listeners(), 0);
    }

    #[tokio::test]
    async fn lagging_screen_skips_to_oldest_buffered() {
        let bus = EventBus::new();
        let mut screen = bus.subscribe();
        for n in 0..CHANNEL_CAPACITY + 10 {
            bus.publish(paid(&format!("o-{}", n)));
        }

        let first = screen.recv().await.unwrap();
        assert_eq!(first.event.order_id(), "o-10");
    }

    #[tokio::test]
    async fn closed_bus_ends_the_stream() {
        let bus = EventBus::new();
        let mut screen = bus.subscribe();
        drop(bus);
        assert!(screen.recv().await.is_none());
    }
}
