//! ChatConnector port - how a client reaches the gateway.
//!
//! The client messaging adapter only speaks the frame protocol. A connector
//! turns "open a connection" into a pair of channels, whatever the transport
//! underneath (in-process gateway, WebSocket, ...).

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::messaging::{ClientFrame, ServerFrame};

/// Errors raised by the client side of the messaging protocol.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect: {0}")]
    Connect(String),

    #[error("Connection is closed")]
    Closed,

    #[error("Invalid destination: {0}")]
    InvalidDestination(String),
}

/// An open client connection.
///
/// Dropping `outbound` closes the connection. `inbound` is bounded and yields
/// `None` once the gateway side is gone.
pub struct ClientChannel {
    pub outbound: mpsc::UnboundedSender<ClientFrame>,
    pub inbound: mpsc::Receiver<ServerFrame>,
}

/// Port for opening client connections to the gateway.
#[async_trait]
pub trait ChatConnector: Send + Sync {
    async fn connect(&self) -> Result<ClientChannel, ClientError>;
}
