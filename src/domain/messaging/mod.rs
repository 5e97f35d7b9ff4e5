//! Messaging domain - addressing, payloads, and connection lifecycle.
//!
//! Pure types and rules with no I/O. The registry, router, and gateway
//! build on these.

pub mod address;
mod connection_state;
mod errors;
mod frames;
mod message;
mod participant;

pub use address::{
    employee_room, room_for, target_room_for, RoomName, EMPLOYEE_ROOM_PREFIX, OWNER_ROOM,
};
pub use connection_state::ConnectionState;
pub use errors::{DeliveryError, MessagingError};
pub use frames::{ClientFrame, ServerFrame};
pub use message::{ChatMessage, DEFAULT_MAX_TEXT_CHARS};
pub use participant::{Participant, Role};
