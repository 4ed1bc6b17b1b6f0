use serde::{Deserialize, Serialize};
use serde_json::Value;
use summariser_common::SummariserError;

/// Body of `POST /summarize` and `POST /keypoints`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    /// Raw, unsanitized input text
    pub text: String,
}

impl SummarizeRequest {
    /// Validate a decoded JSON payload.
    ///
    /// `text` must be present, non-null and a string. Emptiness is left to
    /// the length check after sanitation.
    pub fn from_payload(payload: &Value) -> Result<Self, SummariserError> {
        let Some(object) = payload.as_object() else {
            return Err(SummariserError::validation(
                "Request body must be a JSON object",
            ));
        };

        match object.get("text") {
            None | Some(Value::Null) => Err(SummariserError::validation("Missing 'text' field")),
            Some(Value::String(text)) => Ok(Self { text: text.clone() }),
            Some(_) => Err(SummariserError::validation("'text' must be a string")),
        }
    }
}

/// Uniform error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `GET /health` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}
