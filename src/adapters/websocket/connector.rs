//! Client-side connector over a real WebSocket.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::adapters::memory::DEFAULT_QUEUE_CAPACITY;
use crate::domain::messaging::{ClientFrame, ServerFrame};
use crate::ports::{ChatConnector, ClientChannel, ClientError};

use super::codec;

/// Opens `ws://` connections to a running gateway.
///
/// The URL is used as given, query string included.
#[derive(Debug, Clone)]
pub struct WebSocketConnector {
    url: String,
}

impl WebSocketConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatConnector for WebSocketConnector {
    async fn connect(&self) -> Result<ClientChannel, ClientError> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;
        let (mut write, mut read) = stream.split();

        let (outbound, mut requests) = mpsc::unbounded_channel::<ClientFrame>();
        let (deliver, inbound) = mpsc::channel::<ServerFrame>(DEFAULT_QUEUE_CAPACITY);

        tokio::spawn(async move {
            while let Some(frame) = requests.recv().await {
                let text = match codec::encode_client_frame(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!("Failed to encode client frame: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    tracing::debug!("WebSocket write failed: {}", e);
                    return;
                }
            }
            // Outbound sender dropped: the client is done.
            if let Err(e) = write.close().await {
                tracing::debug!("WebSocket close failed: {}", e);
            }
        });

        tokio::spawn(async move {
            while let Some(result) = read.next().await {
                match result {
                    Ok(Message::Text(text)) => match codec::decode_server_frame(&text) {
                        Ok(frame) => {
                            if deliver.send(frame).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::debug!("Ignoring server frame: {}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!("WebSocket read failed: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(ClientChannel { outbound, inbound })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_server_is_connect_error() {
        // Port 1 on loopback is never a WebSocket server.
        let connector = WebSocketConnector::new("ws://127.0.0.1:1/ws");

        let result = connector.connect().await;

        assert!(matches!(result, Err(ClientError::Connect(_))));
    }
}
