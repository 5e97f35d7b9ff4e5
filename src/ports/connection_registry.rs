//! ConnectionRegistry port - Interface for connection-scoped room membership.
//!
//! The registry is the only shared mutable state in the messaging core. It
//! tracks which live connections have joined which rooms, and holds the sink
//! used to push frames to each connection.
//!
//! ## Lifecycle
//!
//! 1. Gateway accepts a transport and calls `register`
//! 2. Join requests call `join` (idempotent)
//! 3. Router calls `recipients_of` for every routed message
//! 4. Transport closes; gateway calls `leave_all` exactly once
//!
//! Implementations must make every mutation atomic with respect to
//! `members_of`: a reader never sees a half-applied join or teardown.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::ConnectionId;
use crate::domain::messaging::{MessagingError, RoomName};

use super::DeliverySink;

/// Port for tracking live connections and their room memberships.
///
/// # Example
///
/// ```ignore
/// registry.register(connection_id, sink).await;
/// registry.join(&connection_id, &room).await?;
///
/// for member in registry.members_of(&room).await {
///     if let Some(sink) = registry.sink_for(&member).await {
///         let _ = sink.deliver(frame.clone());
///     }
/// }
///
/// registry.leave_all(&connection_id).await;
/// ```
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Record a live connection and where to deliver its frames.
    ///
    /// Registering an id that is already present replaces its sink and keeps
    /// its memberships.
    async fn register(&self, connection_id: ConnectionId, sink: Arc<dyn DeliverySink>);

    /// Add a connection to a room. Joining twice is a no-op.
    ///
    /// Fails with `UnknownConnection` if the connection is not registered.
    async fn join(&self, connection_id: &ConnectionId, room: &RoomName)
        -> Result<(), MessagingError>;

    /// Remove a connection from one room.
    ///
    /// Returns true if the connection was a member.
    async fn leave(&self, connection_id: &ConnectionId, room: &RoomName) -> bool;

    /// Remove a connection from every room and forget it.
    ///
    /// Returns the rooms it held. Unknown connections yield an empty list.
    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomName>;

    /// Point-in-time snapshot of the connections joined to a room.
    async fn members_of(&self, room: &RoomName) -> HashSet<ConnectionId>;

    /// Sink for a registered connection.
    async fn sink_for(&self, connection_id: &ConnectionId) -> Option<Arc<dyn DeliverySink>>;

    /// Members of `room` paired with their sinks, taken in one consistent
    /// read.
    async fn recipients_of(&self, room: &RoomName) -> Vec<(ConnectionId, Arc<dyn DeliverySink>)>;

    /// Rooms a connection has joined.
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomName>;

    /// Rooms with at least one member.
    async fn active_rooms(&self) -> Vec<RoomName>;

    /// Number of registered connections.
    async fn connection_count(&self) -> usize;
}
