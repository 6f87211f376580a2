//! Push Transport
//!
//! The subscribe/unsubscribe-by-channel-name boundary to the real-time
//! transport. The shipped implementation is a WebSocket client; tests use
//! in-process fakes behind the same trait.

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::messages::{ClientFrame, ServerFrame, NOTIFICATION_RECEIVED};

/// A real-time publish/subscribe transport.
///
/// `subscribe` yields a receiver of `notification.received` event payloads
/// for the given channel; other events on the channel are filtered out by
/// the implementation.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn subscribe(
        &self,
        channel: &str,
    ) -> Result<mpsc::UnboundedReceiver<serde_json::Value>, PushError>;

    async fn unsubscribe(&self, channel: &str) -> Result<(), PushError>;
}

/// Errors from the push transport
#[derive(Error, Debug)]
pub enum PushError {
    #[error("Push transport unavailable: {0}")]
    Unavailable(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Transport not connected")]
    NotConnected,
}

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// WebSocket-backed push transport.
///
/// Connects lazily on the first `subscribe`, sends a subscribe frame, and
/// forwards `notification.received` event payloads to the returned
/// receiver. `unsubscribe` sends the unsubscribe frame and tears the
/// connection down.
pub struct WsTransport {
    url: String,
    client_id: String,
    writer: Mutex<Option<WsSink>>,
    reader_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl WsTransport {
    /// Create a transport for the given WebSocket URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client_id: uuid::Uuid::new_v4().to_string(),
            writer: Mutex::new(None),
            reader_task: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PushTransport for WsTransport {
    async fn subscribe(
        &self,
        channel: &str,
    ) -> Result<mpsc::UnboundedReceiver<serde_json::Value>, PushError> {
        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| PushError::Unavailable(e.to_string()))?;
        let (mut write, mut read) = stream.split();

        let frame = ClientFrame::Subscribe {
            channels: vec![channel.to_string()],
            client_id: self.client_id.clone(),
        };
        write
            .send(Message::Text(serde_json::to_string(&frame)?))
            .await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let subscribed_channel = channel.to_string();

        let task = tokio::spawn(async move {
            while let Some(message) = read.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        let frame: ServerFrame = match serde_json::from_str(&text) {
                            Ok(frame) => frame,
                            Err(e) => {
                                tracing::warn!(error = %e, "Unparseable push frame, dropping");
                                continue;
                            }
                        };

                        match frame {
                            ServerFrame::Event {
                                channel,
                                event,
                                data,
                            } if event == NOTIFICATION_RECEIVED => {
                                if channel == subscribed_channel {
                                    if tx.send(data).is_err() {
                                        break;
                                    }
                                }
                            }
                            ServerFrame::Error { message } => {
                                tracing::warn!(message, "Push transport reported an error");
                            }
                            _ => {}
                        }
                    }
                    Ok(Message::Close(_)) => {
                        tracing::debug!("Push connection closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Push connection error");
                        break;
                    }
                }
            }
        });

        *self.writer.lock().await = Some(write);
        *self.reader_task.lock().await = Some(task);

        tracing::info!(channel, "Push channel subscribed");
        Ok(rx)
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), PushError> {
        if let Some(task) = self.reader_task.lock().await.take() {
            task.abort();
        }

        let mut writer = self.writer.lock().await;
        let write = writer.as_mut().ok_or(PushError::NotConnected)?;

        let frame = ClientFrame::Unsubscribe {
            channels: vec![channel.to_string()],
        };
        write
            .send(Message::Text(serde_json::to_string(&frame)?))
            .await?;
        write.close().await?;
        *writer = None;

        tracing::info!(channel, "Push channel unsubscribed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_fails_cleanly_when_unreachable() {
        // Nothing listens on this port; setup failure must surface as
        // Unavailable so the bridge can degrade to polling.
        let transport = WsTransport::new("ws://127.0.0.1:9");
        match transport.subscribe("user.1").await {
            Err(PushError::Unavailable(_)) => {}
            other => panic!("Expected Unavailable, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_unsubscribe_without_connection() {
        let transport = WsTransport::new("ws://127.0.0.1:9");
        assert!(matches!(
            transport.unsubscribe("private-user.1").await,
            Err(PushError::NotConnected)
        ));
    }
}
