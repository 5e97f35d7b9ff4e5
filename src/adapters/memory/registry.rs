//! In-memory connection registry.
//!
//! # Layout
//!
//! ```text
//! rooms:        employee:42 ─▶ {conn-a, conn-b}     owner ─▶ {conn-c}
//! connections:  conn-a ─▶ (sink, {employee:42})
//!               conn-b ─▶ (sink, {employee:42})
//!               conn-c ─▶ (sink, {owner})
//! ```
//!
//! Both maps sit behind one `RwLock`. Routing only takes the read lock, and
//! every join/leave holds the write lock for its whole update, so a reader
//! never sees the two maps disagree.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::ConnectionId;
use crate::domain::messaging::{MessagingError, RoomName};
use crate::ports::{ConnectionRegistry, DeliverySink};

struct ConnectionEntry {
    sink: Arc<dyn DeliverySink>,
    rooms: HashSet<RoomName>,
}

#[derive(Default)]
struct Membership {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    rooms: HashMap<RoomName, HashSet<ConnectionId>>,
}

impl Membership {
    fn remove_from_room(&mut self, connection_id: &ConnectionId, room: &RoomName) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(connection_id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }
}

/// Process-local registry, owned by the gateway for the lifetime of the
/// service.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    inner: RwLock<Membership>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection_id: ConnectionId, sink: Arc<dyn DeliverySink>) {
        let mut inner = self.inner.write().await;
        match inner.connections.get_mut(&connection_id) {
            Some(entry) => entry.sink = sink,
            None => {
                inner.connections.insert(
                    connection_id,
                    ConnectionEntry {
                        sink,
                        rooms: HashSet::new(),
                    },
                );
            }
        }
    }

    async fn join(
        &self,
        connection_id: &ConnectionId,
        room: &RoomName,
    ) -> Result<(), MessagingError> {
        let mut inner = self.inner.write().await;

        let entry = inner
            .connections
            .get_mut(connection_id)
            .ok_or(MessagingError::UnknownConnection(*connection_id))?;
        if !entry.rooms.insert(room.clone()) {
            return Ok(());
        }

        inner
            .rooms
            .entry(room.clone())
            .or_default()
            .insert(*connection_id);
        Ok(())
    }

    async fn leave(&self, connection_id: &ConnectionId, room: &RoomName) -> bool {
        let mut inner = self.inner.write().await;

        let was_member = inner
            .connections
            .get_mut(connection_id)
            .map(|entry| entry.rooms.remove(room))
            .unwrap_or(false);
        if was_member {
            inner.remove_from_room(connection_id, room);
        }
        was_member
    }

    async fn leave_all(&self, connection_id: &ConnectionId) -> Vec<RoomName> {
        let mut inner = self.inner.write().await;

        let Some(entry) = inner.connections.remove(connection_id) else {
            return Vec::new();
        };
        let mut rooms: Vec<RoomName> = entry.rooms.into_iter().collect();
        rooms.sort();
        for room in &rooms {
            inner.remove_from_room(connection_id, room);
        }
        rooms
    }

    async fn members_of(&self, room: &RoomName) -> HashSet<ConnectionId> {
        self.inner
            .read()
            .await
            .rooms
            .get(room)
            .cloned()
            .unwrap_or_default()
    }

    async fn sink_for(&self, connection_id: &ConnectionId) -> Option<Arc<dyn DeliverySink>> {
        self.inner
            .read()
            .await
            .connections
            .get(connection_id)
            .map(|entry| Arc::clone(&entry.sink))
    }

    async fn recipients_of(&self, room: &RoomName) -> Vec<(ConnectionId, Arc<dyn DeliverySink>)> {
        let inner = self.inner.read().await;
        let Some(members) = inner.rooms.get(room) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|id| {
                inner
                    .connections
                    .get(id)
                    .map(|entry| (*id, Arc::clone(&entry.sink)))
            })
            .collect()
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomName> {
        let inner = self.inner.read().await;
        let mut rooms: Vec<RoomName> = inner
            .connections
            .get(connection_id)
            .map(|entry| entry.rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    async fn active_rooms(&self) -> Vec<RoomName> {
        let mut rooms: Vec<RoomName> = self.inner.read().await.rooms.keys().cloned().collect();
        rooms.sort();
        rooms
    }

    async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}
