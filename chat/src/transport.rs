use std::time::Duration;

use async_trait::async_trait;
use gemini_core::{RelayRequest, RelayResponse};
use log::debug;
use reqwest::Client;
use thiserror::Error;

/// Shown when a failure carries no description of its own
pub const GENERIC_SEND_ERROR: &str = "An error occurred while sending the message.";

/// Why a relay call failed, as seen by the chat client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayClientError {
    /// The relay answered with `{ "error": ... }`
    #[error("{0}")]
    Relay(String),

    /// The relay could not be reached or the request did not complete
    #[error("{0}")]
    Transport(String),

    /// The relay answered with something other than a relay response body
    #[error("Unexpected response from relay: {0}")]
    InvalidResponse(String),
}

impl RelayClientError {
    /// Text recorded as the session's transient error
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_SEND_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Sends one message to the relay and yields the reply text.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn relay(&self, message: &str) -> Result<String, RelayClientError>;
}

/// Talks to the relay daemon's `POST /api/chat` over HTTP
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: Client,
    url: String,
}

impl HttpRelayTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RelayClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn relay(&self, message: &str) -> Result<String, RelayClientError> {
        debug!("Sending {} bytes to {}", message.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&RelayRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        // An `error` field wins regardless of status
        match serde_json::from_slice::<RelayResponse>(&bytes) {
            Ok(RelayResponse::Error { error }) => Err(RelayClientError::Relay(error)),
            Ok(RelayResponse::Reply { response }) if status.is_success() => Ok(response),
            Ok(RelayResponse::Reply { .. }) => Err(RelayClientError::InvalidResponse(format!(
                "status {}",
                status.as_u16()
            ))),
            Err(e) => Err(RelayClientError::InvalidResponse(format!(
                "status {}: {}",
                status.as_u16(),
                e
            ))),
        }
    }
}
