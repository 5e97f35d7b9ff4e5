//! Messaging use cases.
//!
//! - [`Router`] - delivers a message to every member of a room
//! - [`SessionGateway`] - per-connection lifecycle (connect, join, send, disconnect)
//! - [`ChatClient`] - client-side session with transcript and subscriptions

mod client;
mod gateway;
mod router;

pub use client::{ChatClient, Subscription, TranscriptEntry};
pub use gateway::{GatewayConfig, SessionGateway};
pub use router::Router;
