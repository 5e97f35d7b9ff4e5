//! Client messaging adapter - one per mounted chat view.
//!
//! Opens a connection through a [`ChatConnector`], joins the caller's own
//! room, and keeps an in-memory transcript of everything sent and received.
//!
//! # Lifecycle
//!
//! ```text
//! mount ──▶ connect ──▶ join own room ──▶ pump inbound frames
//!                                              │
//! unmount ──▶ drop handlers ──▶ stop pump ──▶ close connection
//! ```
//!
//! Handlers registered with [`ChatClient::subscribe`] are never invoked after
//! their [`Subscription`] is cancelled or after [`ChatClient::unmount`].

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::domain::foundation::ConnectionId;
use crate::domain::messaging::{
    employee_room, room_for, ChatMessage, ClientFrame, Participant, Role, RoomName, ServerFrame,
};
use crate::ports::{ChatConnector, ClientError};

/// One line of the local transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// Received from the gateway.
    Incoming(ChatMessage),
    /// Sent by this client, appended optimistically.
    Outgoing { to: RoomName, message: ChatMessage },
}

impl TranscriptEntry {
    pub fn message(&self) -> &ChatMessage {
        match self {
            TranscriptEntry::Incoming(message) => message,
            TranscriptEntry::Outgoing { message, .. } => message,
        }
    }

    pub fn is_incoming(&self) -> bool {
        matches!(self, TranscriptEntry::Incoming(_))
    }
}

type MessageHandler = Arc<dyn Fn(&ChatMessage) + Send + Sync>;

#[derive(Default)]
struct HandlerTable {
    next_id: u64,
    handlers: HashMap<u64, MessageHandler>,
    closed: bool,
}

/// Heartbeat waiters, plus whether anyone is left to answer them.
#[derive(Default)]
struct PongWaiters {
    queue: VecDeque<oneshot::Sender<u64>>,
    closed: bool,
}

#[derive(Default)]
struct Shared {
    transcript: Mutex<Vec<TranscriptEntry>>,
    handlers: Mutex<HandlerTable>,
    pong_waiters: Mutex<PongWaiters>,
    connection_id: Mutex<Option<ConnectionId>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Shared {
    fn receive(&self, message: ChatMessage) {
        // The handler table lock is held while handlers run, so an
        // unsubscribe that has returned cannot race a delivery.
        let table = lock(&self.handlers);
        if table.closed {
            return;
        }
        lock(&self.transcript).push(TranscriptEntry::Incoming(message.clone()));
        for handler in table.handlers.values() {
            handler(&message);
        }
    }

    fn remove_handler(&self, id: u64) {
        lock(&self.handlers).handlers.remove(&id);
    }

    /// Marks the inbound side as gone and fails every pending heartbeat.
    fn close_inbound(&self) {
        let mut waiters = lock(&self.pong_waiters);
        waiters.closed = true;
        waiters.queue.clear();
    }

    fn inbound_closed(&self) -> bool {
        lock(&self.pong_waiters).closed
    }

    fn close_handlers(&self) {
        let mut table = lock(&self.handlers);
        table.closed = true;
        table.handlers.clear();
    }
}

/// Handle for a registered message handler.
///
/// Dropping it unsubscribes too.
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    /// Deregisters the handler. Once this returns, the handler will not be
    /// called again.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove_handler(self.id);
        }
    }
}

/// Chat session for one participant.
pub struct ChatClient {
    participant: Participant,
    own_room: RoomName,
    outbound: mpsc::UnboundedSender<ClientFrame>,
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    pump: Option<JoinHandle<()>>,
}

impl ChatClient {
    /// Opens a connection and joins the participant's own room.
    ///
    /// Employees join `employee:<id>`; the owner joins `owner` so that
    /// employee replies reach it. The owner never pre-joins employee rooms.
    pub async fn mount(
        connector: &dyn ChatConnector,
        participant: Participant,
    ) -> Result<Self, ClientError> {
        let channel = connector.connect().await?;
        let own_room = room_for(&participant);

        channel
            .outbound
            .send(ClientFrame::Join {
                room: own_room.as_str().to_string(),
            })
            .map_err(|_| ClientError::Closed)?;

        let shared = Arc::new(Shared::default());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let pump = tokio::spawn(pump_frames(Arc::clone(&shared), channel.inbound, shutdown_rx));

        tracing::debug!(
            role = %participant.role(),
            room = %own_room,
            "Chat client mounted"
        );

        Ok(Self {
            participant,
            own_room,
            outbound: channel.outbound,
            shared,
            shutdown,
            pump: Some(pump),
        })
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    /// The room this client listens on.
    pub fn own_room(&self) -> &RoomName {
        &self.own_room
    }

    /// Connection id assigned by the gateway, once the greeting has arrived.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        *lock(&self.shared.connection_id)
    }

    /// Where `send` goes without an explicit destination.
    ///
    /// Employees always talk to the owner. The owner picks an employee per
    /// conversation, so it has no default.
    pub fn default_destination(&self) -> Option<RoomName> {
        match self.participant.role() {
            Role::Employee => Some(RoomName::owner()),
            Role::Owner => None,
        }
    }

    /// Sends to the default destination.
    pub fn send(&self, text: &str) -> Result<bool, ClientError> {
        let destination = self.default_destination().ok_or_else(|| {
            ClientError::InvalidDestination("no default destination for owner".to_string())
        })?;
        self.send_to(&destination, text)
    }

    /// Sends to an employee by id.
    pub fn send_to_employee(&self, employee_id: &str, text: &str) -> Result<bool, ClientError> {
        let destination =
            employee_room(employee_id).map_err(|e| ClientError::InvalidDestination(e.to_string()))?;
        self.send_to(&destination, text)
    }

    /// Sends a message to a room.
    ///
    /// Blank text is ignored and returns `Ok(false)`. Otherwise the message is
    /// handed to the connection and appended to the transcript right away;
    /// there is no delivery confirmation.
    pub fn send_to(&self, destination: &RoomName, text: &str) -> Result<bool, ClientError> {
        if text.trim().is_empty() {
            return Ok(false);
        }

        let message = ChatMessage::new(self.participant.sender_label(), text);
        self.outbound
            .send(ClientFrame::PrivateMessage {
                to: destination.as_str().to_string(),
                message: message.clone(),
            })
            .map_err(|_| ClientError::Closed)?;

        lock(&self.shared.transcript).push(TranscriptEntry::Outgoing {
            to: destination.clone(),
            message,
        });
        Ok(true)
    }

    /// Registers a handler for incoming messages.
    ///
    /// Handlers run on the pump task and must not subscribe or unsubscribe
    /// from inside the callback.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ChatMessage) + Send + Sync + 'static,
    {
        let mut table = lock(&self.shared.handlers);
        let id = table.next_id;
        table.next_id += 1;
        if !table.closed {
            table.handlers.insert(id, Arc::new(handler));
        }
        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Snapshot of the transcript in arrival/send order.
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        lock(&self.shared.transcript).clone()
    }

    /// Incoming messages only.
    pub fn received(&self) -> Vec<ChatMessage> {
        lock(&self.shared.transcript)
            .iter()
            .filter_map(|entry| match entry {
                TranscriptEntry::Incoming(message) => Some(message.clone()),
                TranscriptEntry::Outgoing { .. } => None,
            })
            .collect()
    }

    /// Round-trips a heartbeat.
    ///
    /// The gateway handles one connection's frames in order, so once this
    /// returns every earlier request (such as the initial join) has been
    /// processed.
    ///
    /// Fails with `ClientError::Closed` once the gateway side has gone away.
    pub async fn sync(&self) -> Result<(), ClientError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut waiters = lock(&self.shared.pong_waiters);
            if waiters.closed {
                return Err(ClientError::Closed);
            }
            waiters.queue.push_back(tx);
        }
        self.outbound
            .send(ClientFrame::Ping)
            .map_err(|_| ClientError::Closed)?;
        rx.await.map(|_| ()).map_err(|_| ClientError::Closed)
    }

    /// False once either direction of the connection has closed.
    pub fn is_connected(&self) -> bool {
        !self.outbound.is_closed() && !self.shared.inbound_closed()
    }

    /// Tears the view down: deregisters every handler, stops the pump, and
    /// closes the connection.
    pub async fn unmount(mut self) {
        self.teardown();
        if let Some(pump) = self.pump.take() {
            if let Err(e) = pump.await {
                tracing::debug!("Chat pump ended abnormally: {}", e);
            }
        }
        tracing::debug!(room = %self.own_room, "Chat client unmounted");
        // Dropping `self` drops the outbound sender, which closes the
        // connection.
    }

    fn teardown(&mut self) {
        self.shared.close_handlers();
        let _ = self.shutdown.send(true);
    }
}

impl Drop for ChatClient {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn pump_frames(
    shared: Arc<Shared>,
    mut inbound: mpsc::Receiver<ServerFrame>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            frame = inbound.recv() => match frame {
                Some(ServerFrame::Message(message)) => shared.receive(message),
                Some(ServerFrame::Connected { connection_id }) => {
                    *lock(&shared.connection_id) = Some(connection_id);
                }
                Some(ServerFrame::Pong { ts }) => {
                    if let Some(waiter) = lock(&shared.pong_waiters).queue.pop_front() {
                        let _ = waiter.send(ts);
                    }
                }
                None => break,
            },
        }
    }
    shared.close_inbound();
}
