use reqwest::Client;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

/// Client for interacting with the Gemini API
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

// Hand-written so the key can never end up in a log line.
impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeminiError::ConfigError(
                    "API key is required to initialize the Gemini client".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                GeminiError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: config.endpoint_url(),
        })
    }

    /// The `generateContent` URL requests are sent to (without the key)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate content using the Gemini API, returning the raw JSON body.
    ///
    /// Exactly one request is made. Non-success statuses, network failures and
    /// bodies that are not JSON all come back as transport errors.
    pub async fn generate_content(&self, request: &GenerateContentRequest) -> GeminiResult<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Gemini API responded");

        if !status.is_success() {
            let error_body = response.text().await?;
            warn!(status = status.as_u16(), "Gemini API request failed");
            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice::<Value>(&bytes)?;
        Ok(body)
    }

    /// Sends `message` as a single-turn prompt and extracts the reply text.
    pub async fn chat(&self, message: &str) -> GeminiResult<String> {
        let request = GenerateContentRequest::from_prompt(message);
        let body = self.generate_content(&request).await?;
        extract_reply(&body).map_err(|e| {
            if let GeminiError::UpstreamShapeError { missing } = &e {
                warn!(missing = *missing, "Gemini API response failed shape validation");
            }
            e
        })
    }
}
