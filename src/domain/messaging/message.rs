//! Chat message payload.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

use super::errors::MessagingError;

/// Default upper bound on message text length, in characters.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 4000;

/// A direct message as delivered to recipients.
///
/// The destination room travels out of band and is never part of this
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display label of the sender.
    pub from: String,
    /// Message body.
    pub text: String,
    /// Send time in Unix milliseconds, stamped by the sender.
    pub ts: u64,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn new(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self::at(from, text, Timestamp::now())
    }

    /// Creates a message stamped with the given time.
    pub fn at(from: impl Into<String>, text: impl Into<String>, ts: Timestamp) -> Self {
        Self {
            from: from.into(),
            text: text.into(),
            ts: ts.as_unix_millis(),
        }
    }

    /// True if the text is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Send time as a timestamp, if representable.
    pub fn timestamp(&self) -> Option<Timestamp> {
        Timestamp::from_unix_millis(self.ts)
    }

    /// Checks the message before it is routed.
    pub fn validate(&self, max_text_chars: usize) -> Result<(), MessagingError> {
        if self.is_blank() {
            return Err(MessagingError::EmptyMessage);
        }
        let chars = self.text.chars().count();
        if chars > max_text_chars {
            return Err(ValidationError::too_long("text", max_text_chars, chars).into());
        }
        Ok(())
    }
}
