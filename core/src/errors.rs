use thiserror::Error;

/// User-facing message for any upstream payload that fails shape validation.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from Gemini API";

/// User-facing message for failures that carry no usable description.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Gemini relay errors
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("{0}")]
    ValidationError(String),

    /// The upstream payload did not contain `candidates[0].content.parts[0].text`.
    /// `missing` names the first level that was absent and is only meant for logs.
    #[error("Invalid response from Gemini API")]
    UpstreamShapeError { missing: &'static str },

    #[error("{0}")]
    TransportError(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    #[error("An unknown error occurred")]
    UnknownError,
}

/// Coarse classification used at the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UpstreamShape,
    Transport,
    Unknown,
}

impl GeminiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GeminiError::ValidationError(_) => ErrorKind::Validation,
            GeminiError::UpstreamShapeError { .. } => ErrorKind::UpstreamShape,
            GeminiError::TransportError(_)
            | GeminiError::HttpError { .. }
            | GeminiError::SerdeError(_) => ErrorKind::Transport,
            GeminiError::ConfigError(_) | GeminiError::UnknownError => ErrorKind::Unknown,
        }
    }

    /// Message safe to hand back to the caller.
    ///
    /// Shape failures collapse to a fixed string so the upstream payload is never
    /// echoed back.
    pub fn public_message(&self) -> String {
        match self {
            GeminiError::UpstreamShapeError { .. } => INVALID_RESPONSE_MESSAGE.to_string(),
            GeminiError::ConfigError(_) | GeminiError::UnknownError => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

// The request URL carries the API key as a query parameter, so it is dropped
// before the error can reach a log line or a response body.
impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        GeminiError::TransportError(message)
    }
}

/// Result type for Gemini operations
pub type GeminiResult<T> = Result<T, GeminiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_errors_never_expose_details() {
        let err = GeminiError::UpstreamShapeError {
            missing: "candidates",
        };
        assert_eq!(err.kind(), ErrorKind::UpstreamShape);
        assert_eq!(err.public_message(), INVALID_RESPONSE_MESSAGE);
        assert!(!err.public_message().contains("candidates"));
    }

    #[test]
    fn http_errors_are_transport_errors() {
        let err = GeminiError::HttpError {
            status_code: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.public_message(), "HTTP Error: 503 - overloaded");
    }

    #[test]
    fn config_errors_are_reported_generically() {
        let err = GeminiError::ConfigError("API key missing".to_string());
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.public_message(), UNKNOWN_ERROR_MESSAGE);
    }
}
