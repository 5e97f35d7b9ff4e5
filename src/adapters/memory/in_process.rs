//! Connector that talks to a gateway in the same process.
//!
//! Used for embedding the chat core without a network hop, and by the
//! end-to-end tests. Each `connect` behaves like a fresh WebSocket: it gets
//! its own connection id, a `connected` greeting, and is torn down when the
//! client drops its outbound sender.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::application::SessionGateway;
use crate::domain::messaging::{ClientFrame, Participant, ServerFrame};
use crate::ports::{ChatConnector, ClientChannel, ClientError};

use super::{ChannelSink, DEFAULT_QUEUE_CAPACITY};

/// Opens connections directly against a [`SessionGateway`].
#[derive(Clone)]
pub struct InProcessConnector {
    gateway: Arc<SessionGateway>,
    participant: Option<Participant>,
    queue_capacity: usize,
}

impl InProcessConnector {
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self {
            gateway,
            participant: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Attaches identity metadata to connections opened by this connector.
    pub fn with_participant(mut self, participant: Participant) -> Self {
        self.participant = Some(participant);
        self
    }

    /// Caps how many frames may wait for the client before deliveries are
    /// refused.
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }
}

#[async_trait]
impl ChatConnector for InProcessConnector {
    async fn connect(&self) -> Result<ClientChannel, ClientError> {
        let (sink, inbound) = ChannelSink::channel(self.queue_capacity);
        let connection_id = self
            .gateway
            .on_connect(Arc::new(sink), self.participant.clone())
            .await;
        self.gateway
            .reply(&connection_id, ServerFrame::Connected { connection_id })
            .await;

        let (outbound, mut requests) = mpsc::unbounded_channel::<ClientFrame>();
        let gateway = Arc::clone(&self.gateway);
        tokio::spawn(async move {
            while let Some(frame) = requests.recv().await {
                gateway.handle_frame(&connection_id, frame).await;
            }
            gateway.on_disconnect(&connection_id).await;
        });

        Ok(ClientChannel { outbound, inbound })
    }
}
