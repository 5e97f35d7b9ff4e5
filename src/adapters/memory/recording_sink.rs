//! Delivery sink that records frames, for tests.
//!
//! Lets the registry, router, and gateway be exercised with fabricated
//! connections and no transport at all.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::messaging::{ChatMessage, DeliveryError, ServerFrame};
use crate::ports::DeliverySink;

/// Records every delivered frame. Can be flipped to "closed" to simulate a
/// torn-down transport.
#[derive(Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<ServerFrame>>,
    closed: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Makes every later delivery fail with `DeliveryError::Closed`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// All frames delivered so far.
    pub fn frames(&self) -> Vec<ServerFrame> {
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Only the chat messages delivered so far, in delivery order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame {
                ServerFrame::Message(message) => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl DeliverySink for RecordingSink {
    fn deliver(&self, frame: ServerFrame) -> Result<(), DeliveryError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DeliveryError::Closed);
        }
        self.frames
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(frame);
        Ok(())
    }
}
