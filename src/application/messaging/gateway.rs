//! Session gateway - per-connection lifecycle for the messaging core.
//!
//! Every transport adapter drives the same four calls:
//!
//! 1. `on_connect` when a transport is established
//! 2. `handle_frame` for each inbound frame, in arrival order
//! 3. `on_disconnect` when the transport closes
//!
//! Validation happens here, once. The router and registry only ever see
//! well-formed room names and non-empty messages.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::foundation::{ConnectionId, StateMachine, Timestamp};
use crate::domain::messaging::{
    target_room_for, ChatMessage, ClientFrame, ConnectionState, MessagingError, Participant,
    RoomName, ServerFrame, DEFAULT_MAX_TEXT_CHARS,
};
use crate::ports::{ConnectionRegistry, DeliverySink};

use super::router::Router;

/// Tunables for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Longest accepted message text, in characters.
    pub max_text_chars: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

struct ConnectionSession {
    state: ConnectionState,
    participant: Option<Participant>,
}

/// Accepts connections, processes join/send requests, and cleans up on
/// disconnect.
///
/// Owns the connection registry for the lifetime of the service.
pub struct SessionGateway {
    registry: Arc<dyn ConnectionRegistry>,
    router: Router,
    sessions: RwLock<HashMap<ConnectionId, ConnectionSession>>,
    config: GatewayConfig,
}

impl SessionGateway {
    /// Create a gateway with default configuration.
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self::with_config(registry, GatewayConfig::default())
    }

    /// Create a gateway with custom configuration.
    pub fn with_config(registry: Arc<dyn ConnectionRegistry>, config: GatewayConfig) -> Self {
        Self {
            router: Router::new(Arc::clone(&registry)),
            registry,
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.registry
    }

    /// Accepts a new connection. Initial state is `Connected`.
    ///
    /// The participant, when known, is trusted as-is; it is kept for logging.
    pub async fn on_connect(
        &self,
        sink: Arc<dyn DeliverySink>,
        participant: Option<Participant>,
    ) -> ConnectionId {
        let connection_id = ConnectionId::new();
        self.registry.register(connection_id, sink).await;

        match &participant {
            Some(p) => tracing::debug!(
                connection_id = %connection_id,
                role = %p.role(),
                address = %p.logical_address(),
                "Connection opened"
            ),
            None => tracing::debug!(connection_id = %connection_id, "Anonymous connection opened"),
        }

        self.sessions.write().await.insert(
            connection_id,
            ConnectionSession {
                state: ConnectionState::Connected,
                participant,
            },
        );
        connection_id
    }

    /// Validates the descriptor and joins the room.
    ///
    /// Invalid descriptors leave the connection state untouched.
    pub async fn on_join_request(
        &self,
        connection_id: &ConnectionId,
        descriptor: &str,
    ) -> Result<RoomName, MessagingError> {
        let room = target_room_for(descriptor)?;

        // Holding the session lock across the registry join keeps join and
        // disconnect for one connection from interleaving.
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(connection_id)
            .filter(|s| s.state.is_open())
            .ok_or(MessagingError::UnknownConnection(*connection_id))?;

        self.registry.join(connection_id, &room).await?;
        session.state = session
            .state
            .transition_to(ConnectionState::Joined)
            .map_err(|_| MessagingError::UnknownConnection(*connection_id))?;

        tracing::debug!(connection_id = %connection_id, room = %room, "Joined room");
        Ok(room)
    }

    /// Routes a message to the destination room.
    ///
    /// Blank text is dropped silently (`Ok(0)`). The sender does not need to
    /// have joined the destination room.
    pub async fn on_send_request(
        &self,
        connection_id: &ConnectionId,
        destination: &str,
        message: ChatMessage,
    ) -> Result<usize, MessagingError> {
        if message.is_blank() {
            tracing::trace!(connection_id = %connection_id, "Blank message ignored");
            return Ok(0);
        }
        if !self.is_open(connection_id).await {
            return Err(MessagingError::UnknownConnection(*connection_id));
        }
        message.validate(self.config.max_text_chars)?;
        let room = target_room_for(destination)?;

        Ok(self.router.route(&room, &message).await)
    }

    /// Removes all memberships and closes the connection. Idempotent.
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.remove(connection_id) else {
            return;
        };

        let rooms = self.registry.leave_all(connection_id).await;
        let state = session
            .state
            .transition_to(ConnectionState::Closed)
            .unwrap_or(ConnectionState::Closed);

        tracing::debug!(
            connection_id = %connection_id,
            rooms = rooms.len(),
            state = %state,
            participant = ?session.participant.as_ref().map(|p| p.logical_address().to_string()),
            "Connection closed"
        );
    }

    /// Dispatches one inbound frame.
    ///
    /// Validation failures are logged and swallowed; they never close the
    /// connection and are never reported back to the client.
    pub async fn handle_frame(&self, connection_id: &ConnectionId, frame: ClientFrame) {
        let result = match frame {
            ClientFrame::Join { room } => self.on_join_request(connection_id, &room).await.map(|_| ()),
            ClientFrame::PrivateMessage { to, message } => self
                .on_send_request(connection_id, &to, message)
                .await
                .map(|_| ()),
            ClientFrame::Ping => {
                self.reply(connection_id, ServerFrame::Pong {
                    ts: Timestamp::now().as_unix_millis(),
                })
                .await;
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::debug!(
                connection_id = %connection_id,
                code = %e.code(),
                "Request rejected: {}",
                e
            );
        }
    }

    /// Sends a frame to a single connection, ignoring failures.
    pub async fn reply(&self, connection_id: &ConnectionId, frame: ServerFrame) {
        if let Some(sink) = self.registry.sink_for(connection_id).await {
            if let Err(e) = sink.deliver(frame) {
                tracing::debug!(connection_id = %connection_id, "Reply dropped: {}", e);
            }
        }
    }

    /// Current state of an open connection.
    ///
    /// Closed connections are forgotten and report `None`, same as ids that
    /// were never seen.
    pub async fn state_of(&self, connection_id: &ConnectionId) -> Option<ConnectionState> {
        self.sessions
            .read()
            .await
            .get(connection_id)
            .map(|s| s.state)
    }

    /// Number of open connections.
    pub async fn open_connections(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn is_open(&self, connection_id: &ConnectionId) -> bool {
        self.sessions
            .read()
            .await
            .get(connection_id)
            .map(|s| s.state.is_open())
            .unwrap_or(false)
    }
}
