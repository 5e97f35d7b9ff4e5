//! Router - delivers an addressed message to every member of a room.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Mutex as AsyncMutex;

use crate::domain::messaging::{ChatMessage, RoomName, ServerFrame};
use crate::ports::ConnectionRegistry;

type RoomLocks = HashMap<RoomName, Arc<AsyncMutex<()>>>;

/// Fire-and-forget room delivery.
///
/// Routes to the same room are serialized: each one holds the room's lock
/// while it snapshots the recipients and hands the frame to every sink, so
/// all members observe messages in the order `route` acquired the room.
/// Different rooms never contend. A closed or saturated connection is
/// skipped and never affects the others. Nothing is queued or retried.
#[derive(Clone)]
pub struct Router {
    registry: Arc<dyn ConnectionRegistry>,
    room_locks: Arc<Mutex<RoomLocks>>,
}

impl Router {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            registry,
            room_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Delivers `message` to the connections joined to `destination` right
    /// now and returns how many it was handed to.
    pub async fn route(&self, destination: &RoomName, message: &ChatMessage) -> usize {
        let room_lock = self.acquire_room(destination);
        let delivered = {
            let _guard = room_lock.lock().await;
            self.deliver(destination, message).await
        };
        self.release_room(destination, room_lock);

        tracing::trace!(room = %destination, delivered, "Message routed");
        delivered
    }

    async fn deliver(&self, destination: &RoomName, message: &ChatMessage) -> usize {
        let recipients = self.registry.recipients_of(destination).await;
        if recipients.is_empty() {
            tracing::debug!(room = %destination, "No listeners, message dropped");
            return 0;
        }

        // No awaits from here on: the whole fan-out happens in one step.
        let frame = ServerFrame::Message(message.clone());
        let mut delivered = 0;
        for (member, sink) in recipients {
            match sink.deliver(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(
                        room = %destination,
                        connection_id = %member,
                        code = %e.code(),
                        "Delivery skipped: {}",
                        e
                    );
                }
            }
        }
        delivered
    }

    fn acquire_room(&self, room: &RoomName) -> Arc<AsyncMutex<()>> {
        let mut locks = lock(&self.room_locks);
        Arc::clone(locks.entry(room.clone()).or_default())
    }

    fn release_room(&self, room: &RoomName, held: Arc<AsyncMutex<()>>) {
        let mut locks = lock(&self.room_locks);
        // Only the map and `held` remain: no route is waiting on this room.
        if Arc::strong_count(&held) == 2 {
            locks.remove(room);
        }
    }

    #[cfg(test)]
    fn tracked_rooms(&self) -> usize {
        lock(&self.room_locks).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
