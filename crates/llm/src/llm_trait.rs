use async_trait::async_trait;
use summariser_common::GenerationError;

use crate::types::GenerateRequest;

/// Text generation backend used by the request pipeline
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a prompt and sampling parameters, return the raw model text
    async fn generate(&self, request: GenerateRequest) -> Result<String, GenerationError>;

    /// Provider name used in logs
    fn provider(&self) -> &str;
}
