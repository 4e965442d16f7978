//! Outbound message delivery.
//!
//! Provides the [`MessageSender`] seam and two implementations:
//! - [`HttpMessageSender`] posts to `{peer}/v1/messages/{message_type}`
//! - [`MemorySender`] records messages in memory for tests and dry runs

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("peer rejected message type {message_type}: {status} {body}")]
    Rejected {
        message_type: u32,
        status: u16,
        body: String,
    },

    #[error("sender configured to fail")]
    Injected,
}

/// Delivers one typed message to the peer.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message_type: u32, payload: &str) -> Result<(), TransportError>;
}

/// Sends messages as HTTP POSTs.
#[derive(Debug, Clone)]
pub struct HttpMessageSender {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMessageSender {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MessageSender for HttpMessageSender {
    async fn send(&self, message_type: u32, payload: &str) -> Result<(), TransportError> {
        let url = format!("{}/v1/messages/{}", self.base_url, message_type);
        debug!(url = %url, len = payload.len(), "Sending message");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                message_type,
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// A message captured by [`MemorySender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_type: u32,
    pub payload: String,
}

/// Records every message instead of delivering it.
#[derive(Debug, Default)]
pub struct MemorySender {
    sent: Mutex<Vec<SentMessage>>,
    fail_sends: bool,
}

impl MemorySender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sender that rejects every message.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    /// Messages recorded so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl MessageSender for MemorySender {
    async fn send(&self, message_type: u32, payload: &str) -> Result<(), TransportError> {
        if self.fail_sends {
            return Err(TransportError::Injected);
        }

        info!(message_type, payload = %payload, "[MEMORY] Message recorded");
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(SentMessage {
                message_type,
                payload: payload.to_string(),
            });
        Ok(())
    }
}
