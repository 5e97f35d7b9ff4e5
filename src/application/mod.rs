//! Application layer - orchestrates the messaging core.
//!
//! Coordinates domain rules with the registry and delivery ports:
//! - `messaging` - router, session gateway, and client messaging adapter

pub mod messaging;

pub use messaging::{
    ChatClient, GatewayConfig, Router, SessionGateway, Subscription, TranscriptEntry,
};
