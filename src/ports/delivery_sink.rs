//! DeliverySink port - where the router pushes frames for one connection.

use crate::domain::messaging::{DeliveryError, ServerFrame};

/// Outbound half of a single connection.
///
/// `deliver` must not block: it hands the frame to the connection's writer
/// and returns. A closed connection reports `DeliveryError::Closed`, which
/// callers treat as "nobody was listening".
pub trait DeliverySink: Send + Sync {
    fn deliver(&self, frame: ServerFrame) -> Result<(), DeliveryError>;
}
