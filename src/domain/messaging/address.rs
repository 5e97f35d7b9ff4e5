//! Address scheme: maps participants and destination descriptors to rooms.
//!
//! This is the only place that knows what a room name looks like. Everything
//! downstream (registry, router, gateway) treats [`RoomName`] as an opaque,
//! case-sensitive string.
//!
//! # Recognised shapes
//!
//! ```text
//! owner            reserved literal for the business owner
//! employee:<id>    one room per employee, <id> = canonical employee id
//! ```

use std::fmt;

use super::errors::MessagingError;
use super::participant::{Participant, Role};

/// Reserved room name for the owner.
pub const OWNER_ROOM: &str = "owner";

/// Prefix of every employee room.
pub const EMPLOYEE_ROOM_PREFIX: &str = "employee:";

/// A validated room name.
///
/// Only constructed through [`room_for`] or [`target_room_for`], so holding a
/// `RoomName` means the string is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    /// The owner's room.
    pub fn owner() -> Self {
        Self(OWNER_ROOM.to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the room a participant listens on.
pub fn room_for(participant: &Participant) -> RoomName {
    match participant.role() {
        Role::Owner => RoomName::owner(),
        Role::Employee => RoomName(format!(
            "{}{}",
            EMPLOYEE_ROOM_PREFIX,
            participant.logical_address()
        )),
    }
}

/// Returns the room for an employee id, e.g. when the owner picks a
/// conversation from the employee list.
pub fn employee_room(employee_id: &str) -> Result<RoomName, MessagingError> {
    target_room_for(&format!("{}{}", EMPLOYEE_ROOM_PREFIX, employee_id))
}

/// Validates a destination descriptor and returns it unchanged as a room.
pub fn target_room_for(descriptor: &str) -> Result<RoomName, MessagingError> {
    if descriptor.is_empty() {
        return Err(MessagingError::invalid_address(descriptor, "descriptor is empty"));
    }
    if descriptor == OWNER_ROOM {
        return Ok(RoomName::owner());
    }
    match descriptor.strip_prefix(EMPLOYEE_ROOM_PREFIX) {
        Some(id) if is_valid_address_id(id) => Ok(RoomName(descriptor.to_string())),
        Some(_) => Err(MessagingError::invalid_address(
            descriptor,
            "employee id must be non-empty ASCII letters, digits, '-', '_', '.' or '+'",
        )),
        None => Err(MessagingError::invalid_address(
            descriptor,
            "expected 'owner' or 'employee:<id>'",
        )),
    }
}

/// Checks the id part of an employee room.
pub(crate) fn is_valid_address_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+'))
}
