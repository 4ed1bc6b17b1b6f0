use async_trait::async_trait;
use std::sync::Mutex;
use summariser_common::GenerationError;

use crate::llm_trait::LlmClient;
use crate::types::GenerateRequest;

/// Canned-response client for tests and offline runs.
///
/// Records every request it receives.
pub struct MockLlm {
    reply: Result<String, GenerationError>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl MockLlm {
    /// Always answer with `text`
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `error`
    pub fn with_error(error: GenerationError) -> Self {
        Self {
            reply: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of generate calls so far
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Last request received, if any
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, request: GenerateRequest) -> Result<String, GenerationError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.reply.clone()
    }

    fn provider(&self) -> &str {
        "mock"
    }
}
