//! Delivery sink backed by a bounded tokio channel.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::messaging::{DeliveryError, ServerFrame};
use crate::ports::DeliverySink;

/// Frames a connection may have queued before further deliveries are refused.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Pushes frames into the connection's writer task.
///
/// The channel preserves push order, so frames routed to one room reach
/// the socket in `route` call order. A reader that falls `capacity` frames
/// behind gets `DeliveryError::Full` until it catches up.
pub struct ChannelSink {
    tx: mpsc::Sender<ServerFrame>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<ServerFrame>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiving end for the writer task.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerFrame>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl DeliverySink for ChannelSink {
    fn deliver(&self, frame: ServerFrame) -> Result<(), DeliveryError> {
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}
