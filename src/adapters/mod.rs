//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the messaging core to the outside world:
//! - `memory` - Connection registry, delivery sinks, in-process connector
//! - `websocket` - `/ws` upgrade handler, frame codec, client connector
//! - `http` - Axum application router and health check

pub mod http;
pub mod memory;
pub mod websocket;

pub use http::create_router;
pub use memory::{ChannelSink, InMemoryConnectionRegistry, InProcessConnector, RecordingSink};
pub use websocket::{WebSocketConnector, WebSocketState};
