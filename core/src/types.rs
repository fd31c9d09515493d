use serde::Serialize;
use serde_json::Value;

use crate::errors::{GeminiError, GeminiResult};

/// Model used when the configuration does not name one
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Request to Gemini API to generate content
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Single-turn request carrying `prompt` as the only text part.
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt.to_string())],
            }],
        }
    }
}

/// One turn of request content
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Part structure for a piece of content
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self { text: Some(text) }
    }
}

/// Pulls the reply text out of a raw `generateContent` response body.
///
/// The payload must have the shape
/// `{ candidates: [{ content: { parts: [{ text: <reply> }] } }] }`; only the first
/// candidate and its first part are considered. Anything absent or of the wrong
/// type yields [`GeminiError::UpstreamShapeError`] naming the failing level.
pub fn extract_reply(body: &Value) -> GeminiResult<String> {
    let candidate = body
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or(GeminiError::UpstreamShapeError {
            missing: "candidates",
        })?
        .first()
        .ok_or(GeminiError::UpstreamShapeError {
            missing: "candidates[0]",
        })?;

    let content = candidate
        .get("content")
        .filter(|c| c.is_object())
        .ok_or(GeminiError::UpstreamShapeError { missing: "content" })?;

    let part = content
        .get("parts")
        .and_then(Value::as_array)
        .ok_or(GeminiError::UpstreamShapeError { missing: "parts" })?
        .first()
        .ok_or(GeminiError::UpstreamShapeError {
            missing: "parts[0]",
        })?;

    part.get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(GeminiError::UpstreamShapeError { missing: "text" })
}
