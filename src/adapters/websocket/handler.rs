//! WebSocket upgrade handler for chat connections.
//!
//! Handles the HTTP → WebSocket upgrade and drives the gateway for the
//! lifetime of the socket:
//! 1. Register the connection and send the `connected` greeting
//! 2. Forward frames routed to this connection to the socket
//! 3. Decode inbound text frames and hand them to the gateway in order
//! 4. Disconnect from the gateway when either side stops

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::adapters::memory::{ChannelSink, DEFAULT_QUEUE_CAPACITY};
use crate::application::SessionGateway;
use crate::domain::foundation::UserId;
use crate::domain::messaging::{Participant, Role, ServerFrame};

use super::codec::{self, DEFAULT_MAX_FRAME_BYTES};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub gateway: Arc<SessionGateway>,
    /// Inbound text frames larger than this are dropped.
    pub max_frame_bytes: usize,
    /// Outbound frames a connection may have queued before deliveries to it
    /// are refused.
    pub queue_capacity: usize,
}

impl WebSocketState {
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self {
            gateway,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

/// Identity hints passed on the upgrade request, e.g.
/// `/ws?role=employee&address=42&name=Dana`.
///
/// Trusted as given and only used for logging.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub role: Option<Role>,
    pub address: Option<String>,
    pub name: Option<String>,
}

impl ConnectParams {
    /// Builds a participant when the hints describe one, `None` otherwise.
    pub fn participant(&self) -> Option<Participant> {
        let role = self.role?;
        let name = self.name.clone().unwrap_or_default();
        match role {
            Role::Owner => {
                let id = UserId::new(self.address.as_deref().unwrap_or("owner")).ok()?;
                Some(Participant::owner(id, name))
            }
            Role::Employee => {
                let id = UserId::new(self.address.as_deref()?).ok()?;
                Participant::employee(id, name).ok()
            }
        }
    }
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET {ws_path}`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<WebSocketState>,
) -> Response {
    let participant = params.participant();
    ws.on_upgrade(move |socket| handle_socket(socket, participant, state))
}

async fn handle_socket(socket: WebSocket, participant: Option<Participant>, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let (sink, mut outgoing) = ChannelSink::channel(state.queue_capacity);
    let connection_id = state.gateway.on_connect(Arc::new(sink), participant).await;
    state
        .gateway
        .reply(&connection_id, ServerFrame::Connected { connection_id })
        .await;

    // Forward routed frames to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outgoing.recv().await {
            let text = match codec::encode_server_frame(&frame) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(connection_id = %connection_id, "Failed to encode frame: {}", e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(text)).await {
                tracing::debug!(
                    connection_id = %connection_id,
                    "Send error, closing connection: {}",
                    e
                );
                break;
            }
        }
    });

    // Handle incoming frames, one at a time
    let gateway = Arc::clone(&state.gateway);
    let max_frame_bytes = state.max_frame_bytes;
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match codec::decode_client_frame(&text, max_frame_bytes) {
                    Ok(frame) => gateway.handle_frame(&connection_id, frame).await,
                    Err(e) => {
                        tracing::debug!(connection_id = %connection_id, "Dropped frame: {}", e);
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level keepalive, answered by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.gateway.on_disconnect(&connection_id).await;
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router(ws_path: &str) -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route(ws_path, get(ws_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConnectionRegistry;

    fn params(role: Option<Role>, address: Option<&str>, name: Option<&str>) -> ConnectParams {
        ConnectParams {
            role,
            address: address.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn employee_params_build_participant() {
        let participant = params(Some(Role::Employee), Some("42"), Some("Dana"))
            .participant()
            .unwrap();

        assert_eq!(participant.role(), Role::Employee);
        assert_eq!(participant.logical_address(), "42");
        assert_eq!(participant.display_name(), "Dana");
    }

    #[test]
    fn owner_without_address_gets_default() {
        let participant = params(Some(Role::Owner), None, None).participant().unwrap();
        assert_eq!(participant.role(), Role::Owner);
    }

    #[test]
    fn employee_without_address_is_anonymous() {
        assert!(params(Some(Role::Employee), None, Some("Dana"))
            .participant()
            .is_none());
    }

    #[test]
    fn missing_role_is_anonymous() {
        assert!(ConnectParams::default().participant().is_none());
    }

    #[test]
    fn websocket_state_shares_gateway() {
        let gateway = Arc::new(SessionGateway::new(Arc::new(InMemoryConnectionRegistry::new())));
        let state = WebSocketState::new(Arc::clone(&gateway))
            .with_max_frame_bytes(64)
            .with_queue_capacity(8);

        assert!(Arc::ptr_eq(&state.gateway, &gateway));
        assert_eq!(state.max_frame_bytes, 64);
        assert_eq!(state.queue_capacity, 8);
    }
}
