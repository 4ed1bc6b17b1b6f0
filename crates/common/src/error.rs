use std::time::Duration;

/// Failure of the text-generation provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Provider refused the prompt or the answer on safety grounds
    #[error("Content blocked by provider: {0}")]
    Blocked(String),

    /// Provider answered without any text
    #[error("Provider returned an empty response")]
    EmptyResponse,

    /// Transport, auth, quota or decoding failure
    #[error("Provider error: {0}")]
    Provider(String),
}

impl GenerationError {
    /// Create provider error
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        Self::Provider(msg.into())
    }
}

/// Model output that does not have the requested shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Nothing but whitespace came back
    #[error("model output is empty")]
    Empty,

    /// No JSON object could be located in the output
    #[error("model output contains no JSON object")]
    NoJsonObject,

    /// JSON object without the required field
    #[error("model output is missing the '{0}' field")]
    MissingField(&'static str),

    /// Field present with the wrong JSON type
    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
}

/// Summariser error types
#[derive(Debug, thiserror::Error)]
pub enum SummariserError {
    /// Request payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body is not JSON
    #[error("Unsupported media type")]
    UnsupportedMediaType,

    /// Request body exceeds the configured limit
    #[error("Payload too large")]
    PayloadTooLarge,

    /// Fixed window exhausted
    #[error("Rate limit exceeded (retry in {}s)", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Generation client failure
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Model output failed schema validation
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General error (anyhow integration)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SummariserError {
    /// Create validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the caller is at fault (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

// HTTP response conversion
impl SummariserError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UnsupportedMediaType => 415,
            Self::PayloadTooLarge => 413,
            Self::RateLimited { .. } => 429,
            Self::Generation(GenerationError::Blocked(_)) => 400,
            Self::Generation(_) => 500,
            Self::Parse(_) => 500,
            Self::Config(_) => 500,
            Self::Io(_) => 500,
            Self::Json(_) => 500,
            Self::Other(_) => 500,
        }
    }

    /// Message that is safe to return to the caller.
    ///
    /// Server-side detail stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::UnsupportedMediaType => "Request must be JSON".to_string(),
            Self::PayloadTooLarge => "Request body too large".to_string(),
            Self::RateLimited { .. } => "Rate limit exceeded".to_string(),
            Self::Generation(GenerationError::Blocked(_)) => {
                "Content blocked by safety filters".to_string()
            }
            Self::Generation(GenerationError::EmptyResponse) => {
                "Summary generation failed".to_string()
            }
            Self::Parse(_) => "Failed to parse model output".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}
