//! Notifications module
//!
//! Order lifecycle events for floor and cashier screens.
//!
//! # WebSocket Endpoint
//! Connect to `/api/v1/notifications/ws?token=<jwt>` with optional query parameters:
//! - `pool_table_id` - Only events for one table
//! - `event_types` - Comma-separated list of event types to receive

pub mod event_bus;
pub mod events;
pub mod websocket;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage, OrderEvent, OrderReleasedEvent};
pub use websocket::{ws_notifications_handler, EventFilter, NotificationState};
