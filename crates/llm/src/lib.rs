//! Summariser LLM Integration
//!
//! Prompt templates, the Gemini generation client and output validation

mod client;
mod llm_trait;
mod mock;
mod output;
mod prompts;
mod types;

pub use client::{interpret_response, request_body, GeminiClient};
pub use llm_trait::LlmClient;
pub use mock::MockLlm;
pub use output::{parse, StructuredResult};
pub use prompts::{build, format_instructions, PromptKind, KEYPOINTS_PROMPT, SUMMARY_PROMPT};
pub use types::{GenerateContentRequest, GenerateContentResponse, GenerateRequest};
