//! Request admission and response shaping
//!
//! `Received → Validated → RateChecked → Generated → Parsed`. Each stage
//! returns its own tagged error; nothing here writes a response or a failure
//! log, the route layer does both exactly once.

use summariser_common::SummariserError;
use summariser_llm::{build, format_instructions, parse, GenerateRequest, PromptKind, StructuredResult};
use tracing::{debug, info};

use crate::sanitize::{sanitize, SanitizedText};
use crate::state::AppState;
use crate::types::SummarizeRequest;

/// Run one request through the pipeline
pub async fn handle(
    state: &AppState,
    kind: PromptKind,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<StructuredResult, SummariserError> {
    let request = validate(content_type, body)?;

    let text = admit_text(state, &request)?;

    state
        .limiter
        .try_admit(kind.as_str())
        .map_err(|retry_after| SummariserError::RateLimited { retry_after })?;

    let prompt = build(kind, text.as_str(), format_instructions(kind));
    let generate = GenerateRequest::new(prompt, state.config.generation.clone())
        .expect_json(kind.expects_json());

    debug!(
        endpoint = kind.as_str(),
        provider = state.client.provider(),
        remaining = state.limiter.remaining(kind.as_str()),
        "Calling generation client"
    );
    let raw = state.client.generate(generate).await?;

    let result = parse(kind, &raw)?;

    info!(
        endpoint = kind.as_str(),
        "Processed {} characters into {} characters",
        text.char_len(),
        result.char_len()
    );

    Ok(result)
}

/// Received → Validated
pub fn validate(content_type: Option<&str>, body: &[u8]) -> Result<SummarizeRequest, SummariserError> {
    if !is_json_content_type(content_type) {
        return Err(SummariserError::UnsupportedMediaType);
    }

    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| SummariserError::validation("Request body is not valid JSON"))?;

    SummarizeRequest::from_payload(&payload)
}

/// Validated → length-checked sanitized text
fn admit_text(state: &AppState, request: &SummarizeRequest) -> Result<SanitizedText, SummariserError> {
    let config = &state.config;
    let text = sanitize(&request.text, config.max_text_length);

    if text.char_len() < config.min_text_length {
        return Err(SummariserError::validation(format!(
            "Text must be at least {} characters",
            config.min_text_length
        )));
    }

    Ok(text)
}

/// `application/json` or any `application/*+json`, parameters ignored
fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
