//! Error types for the messaging core.

use thiserror::Error;

use crate::domain::foundation::{ConnectionId, ErrorCode, ValidationError};

/// Errors raised while validating or processing messaging requests.
///
/// None of these are fatal to a connection. The gateway logs them and carries
/// on; the sender never observes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    /// Room or destination descriptor is malformed.
    #[error("Invalid address '{descriptor}': {reason}")]
    InvalidAddress { descriptor: String, reason: String },

    /// The connection has already been torn down (or never existed).
    #[error("Unknown connection {0}")]
    UnknownConnection(ConnectionId),

    /// Message text is empty after trimming.
    #[error("Message text is empty")]
    EmptyMessage,

    /// Message failed a field-level check other than emptiness.
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] ValidationError),
}

impl MessagingError {
    /// Creates an invalid address error.
    pub fn invalid_address(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        MessagingError::InvalidAddress {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code for logging.
    pub fn code(&self) -> ErrorCode {
        match self {
            MessagingError::InvalidAddress { .. } => ErrorCode::InvalidAddress,
            MessagingError::UnknownConnection(_) => ErrorCode::UnknownConnection,
            MessagingError::EmptyMessage => ErrorCode::EmptyMessage,
            MessagingError::InvalidMessage(_) => ErrorCode::ValidationFailed,
        }
    }
}

/// Failure to hand a frame to a single connection.
///
/// Always scoped to one recipient; the router swallows it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("Connection is closed")]
    Closed,

    /// The connection is not keeping up; its outbound queue is at capacity.
    #[error("Outbound queue is full")]
    Full,
}

impl DeliveryError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::DeliveryFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_address_displays_descriptor_and_reason() {
        let err = MessagingError::invalid_address("boss", "unrecognised room shape");
        assert_eq!(
            format!("{}", err),
            "Invalid address 'boss': unrecognised room shape"
        );
        assert_eq!(err.code(), ErrorCode::InvalidAddress);
    }

    #[test]
    fn validation_error_converts_into_invalid_message() {
        let err: MessagingError = ValidationError::too_long("text", 5, 6).into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn delivery_error_code() {
        assert_eq!(DeliveryError::Closed.code(), ErrorCode::DeliveryFailed);
        assert_eq!(DeliveryError::Full.code(), ErrorCode::DeliveryFailed);
    }

    #[test]
    fn empty_message_code() {
        assert_eq!(MessagingError::EmptyMessage.code(), ErrorCode::EmptyMessage);
    }
}
