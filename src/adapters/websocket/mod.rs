//! WebSocket adapters for the chat protocol.
//!
//! # Architecture
//!
//! ```text
//!   browser / ChatClient ──▶ WebSocketConnector
//!                                   │ ws://host/ws
//!                                   ▼
//!   ws_handler ──▶ codec ──▶ SessionGateway::handle_frame
//!        ▲                          │
//!        └──── ChannelSink ◀── Router::route
//! ```
//!
//! # Components
//!
//! - [`codec`] - JSON text-frame encoding with a size limit
//! - [`handler`] - Axum WebSocket upgrade handler
//! - [`connector`] - Client-side connector using tokio-tungstenite

pub mod codec;
pub mod connector;
pub mod handler;

pub use codec::{CodecError, DEFAULT_MAX_FRAME_BYTES};
pub use connector::WebSocketConnector;
pub use handler::{websocket_router, ws_handler, ConnectParams, WebSocketState};
