use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RelayRequest {
    /// The text the user submitted
    pub message: String,
}

/// Body returned by `POST /api/chat`.
///
/// Serialized untagged, so the wire form is either `{ "response": ... }` or
/// `{ "error": ... }`. A body carrying both fields decodes as an error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RelayResponse {
    Error { error: String },
    Reply { response: String },
}

impl RelayResponse {
    pub fn reply(response: impl Into<String>) -> Self {
        RelayResponse::Reply {
            response: response.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        RelayResponse::Error {
            error: error.into(),
        }
    }

    /// Converts into the reply text or the error message.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            RelayResponse::Reply { response } => Ok(response),
            RelayResponse::Error { error } => Err(error),
        }
    }
}
