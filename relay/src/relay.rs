use gemini_core::client::GeminiClient;
use gemini_core::errors::{GeminiError, GeminiResult};
use gemini_core::RelayRequest;
use tracing::{info, instrument};

/// Forwards one chat message to Gemini and normalizes the outcome.
///
/// Holds no per-request state; the wrapped client is configured once at startup.
#[derive(Debug, Clone)]
pub struct RelayHandler {
    client: GeminiClient,
}

impl RelayHandler {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Relays `request.message` upstream and returns the reply text.
    ///
    /// Blank messages are rejected before any network call is made.
    #[instrument(skip_all, fields(prompt_len = request.message.len()))]
    pub async fn relay(&self, request: RelayRequest) -> GeminiResult<String> {
        if request.message.trim().is_empty() {
            return Err(GeminiError::ValidationError(
                "Message must not be empty".to_string(),
            ));
        }

        let reply = self.client.chat(&request.message).await?;
        info!(reply_len = reply.len(), "Relayed message to Gemini");
        Ok(reply)
    }
}
