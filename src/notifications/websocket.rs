//! WebSocket handler for floor and cashier screens

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use super::event_bus::SharedEventBus;
use super::events::EventMessage;

#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub pool_table_id: Option<String>,
    /// Comma-separated event types
    pub event_types: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, message: &EventMessage) -> bool {
        if let Some(ref table_id) = self.pool_table_id {
            if message.event.pool_table_id() != table_id {
                return false;
            }
        }

        if let Some(ref types) = self.event_types {
            let wanted = message.event.event_type();
            if !types.split(',').map(str::trim).any(|t| t == wanted) {
                return false;
            }
        }

        true
    }
}

#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
}

pub async fn ws_notifications_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    info!(
        "New notification WebSocket connection: table={:?}, event_types={:?}",
        filter.pool_table_id, filter.event_types
    );

    ws.on_upgrade(move |socket| handle_notification_socket(socket, state, filter))
}

async fn handle_notification_socket(
    socket: WebSocket,
    state: NotificationState,
    filter: EventFilter,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = state.event_bus.subscribe();

    let welcome = serde_json::json!({
        "type": "connected",
        "filter": {
            "pool_table_id": filter.pool_table_id,
            "event_types": filter.event_types
        }
    });

    if let Err(e) = sender
        .send(Message::Text(welcome.to_string().into()))
        .await
    {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }

            event = subscriber.recv() => {
                let Some(event_msg) = event else {
                    warn!("Event bus closed");
                    break;
                };
                if !filter.matches(&event_msg) {
                    continue;
                }
                match serde_json::to_string(&event_msg) {
                    Ok(json) => {
                        if let Err(e) = sender.send(Message::Text(json.into())).await {
                            error!("Failed to send event: {}", e);
                            break;
                        }
                        debug!("Event sent to client: {}", event_msg.event.event_type());
                    }
                    Err(e) => error!("Failed to serialize event: {}", e),
                }
            }
        }
    }

    info!("Notification WebSocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::events::{Event, OrderEvent};
    use chrono::Utc;

    fn created(table: &str) -> EventMessage {
        EventMessage::new(Event::OrderCreated(OrderEvent {
            order_id: "o".into(),
            pool_table_id: table.into(),
            customer_name: "Andi".into(),
            duration_hours: 2,
            ends_at: Utc::now(),
            paid: false,
        }))
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(EventFilter::default().matches(&created("t-1")));
    }

    #[test]
    fn filters_by_table_and_type() {
        let filter = EventFilter {
            pool_table_id: Some("t-1".into()),
            event_types: Some("order_paid, order_created".into()),
        };
        assert!(filter.matches(&created("t-1")));
        assert!(!filter.matches(&created("t-2")));

        let only_paid = EventFilter {
            pool_table_id: None,
            event_types: Some("order_paid".into()),
        };
        assert!(!only_paid.matches(&created("t-1")));
    }
}
