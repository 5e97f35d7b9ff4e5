//! Domain layer containing messaging rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `messaging` - Address scheme, chat payloads, participants, connection lifecycle

pub mod foundation;
pub mod messaging;
