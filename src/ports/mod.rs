//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the messaging core and the outside world. Adapters implement these ports.
//!
//! ## Server-side Ports
//!
//! - `ConnectionRegistry` - Room membership for live connections
//! - `DeliverySink` - Outbound frame delivery to one connection
//!
//! ## Client-side Ports
//!
//! - `ChatConnector` - Opens a frame channel to the gateway

mod chat_connector;
mod connection_registry;
mod delivery_sink;

pub use chat_connector::{ChatConnector, ClientChannel, ClientError};
pub use connection_registry::ConnectionRegistry;
pub use delivery_sink::DeliverySink;
