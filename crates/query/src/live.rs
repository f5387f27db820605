//! Server push of cache invalidations over WebSocket.
//!
//! When configured, [`LiveChannel`] listens for messages such as
//! `{"type":"invalidate","key":["courses"]}` and invalidates the matching
//! queries, so observers refetch without waiting for their next poll.
//! Polling stays active as the fallback. Dropped connections are retried
//! with exponential backoff until cancelled.

use futures::StreamExt;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::cache::QueryClient;
use crate::key::QueryKey;
use crate::reconnect::{reconnect_loop, ReconnectConfig};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveMessage {
    Invalidate { key: Vec<String> },
    Remove { key: Vec<String> },
    Ping,
    #[serde(other)]
    Unknown,
}

pub struct LiveChannel {
    url: String,
    client: QueryClient,
    reconnect: ReconnectConfig,
}

impl LiveChannel {
    pub fn new(url: impl Into<String>, client: &QueryClient) -> Self {
        Self {
            url: url.into(),
            client: client.clone(),
            reconnect: ReconnectConfig::default(),
        }
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    /// Connect, apply messages, and reconnect until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        loop {
            let url = self.url.as_str();
            let connected = reconnect_loop(url, &self.reconnect, &cancel, || {
                tokio_tungstenite::connect_async(url)
            })
            .await;

            let Some((mut stream, _response)) = connected else {
                return;
            };
            tracing::info!(url, "Live channel connected");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        let _ = stream.close(None).await;
                        tracing::info!(url, "Live channel stopped");
                        return;
                    }
                    msg = stream.next() => match msg {
                        Some(Ok(Message::Text(text))) => self.apply(&text),
                        Some(Ok(Message::Close(_))) | None => {
                            tracing::info!(url, "Live channel closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(url, error = %e, "Live channel error");
                            break;
                        }
                    }
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(self.reconnect.initial_delay) => {}
            }
        }
    }

    /// Apply one text frame to the cache.
    pub fn apply(&self, text: &str) {
        match serde_json::from_str::<LiveMessage>(text) {
            Ok(LiveMessage::Invalidate { key }) if !key.is_empty() => {
                self.client.invalidate(&QueryKey::from_segments(key));
            }
            Ok(LiveMessage::Remove { key }) if !key.is_empty() => {
                self.client.remove(&QueryKey::from_segments(key));
            }
            Ok(LiveMessage::Ping) => tracing::trace!("Live channel ping"),
            Ok(other) => tracing::debug!(message = ?other, "Ignoring live message"),
            Err(e) => tracing::warn!(error = %e, "Malformed live message"),
        }
    }
}
