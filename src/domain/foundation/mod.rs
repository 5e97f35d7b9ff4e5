//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the Crewdesk messaging domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{ConnectionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
