use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use summariser_common::{GenerationError, Result, SummariserError};
use tracing::{debug, info};

use crate::llm_trait::LlmClient;
use crate::types::{
    Content, GeminiGenerationConfig, GenerateContentRequest, GenerateContentResponse,
    GenerateRequest, Part, SafetySetting,
};

/// Harm categories relaxed to `BLOCK_NONE` on every request
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Finish reasons meaning the provider withheld the answer
const BLOCKING_FINISH_REASONS: [&str; 4] = ["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Gemini REST API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
    client: Client,
}

impl GeminiClient {
    /// Create new Gemini client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SummariserError::config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Gemini client initialized: {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            timeout,
            client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Single attempt, no retries
    async fn try_generate(&self, request: &GenerateRequest) -> std::result::Result<String, GenerationError> {
        let url = self.endpoint(&request.config.model_name);
        let body = request_body(request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::provider(format!("request timed out after {:?}", self.timeout))
                } else {
                    GenerationError::provider(format!("failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(GenerationError::provider(format!(
                "Gemini returned {}: {}",
                status, text
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::provider(format!("failed to parse response: {}", e)))?;

        interpret_response(result)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> std::result::Result<String, GenerationError> {
        debug!(
            "Sending generate request to Gemini - Model: {}, Prompt length: {}",
            request.config.model_name,
            request.prompt.len()
        );

        let text = self.try_generate(&request).await?;

        debug!("Received response from Gemini - Length: {}", text.len());
        Ok(text)
    }

    fn provider(&self) -> &str {
        "gemini"
    }
}

/// Build the wire body for one request
pub fn request_body(request: &GenerateRequest) -> GenerateContentRequest {
    let config = &request.config;

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(request.prompt.clone()),
            }],
        }],
        generation_config: GeminiGenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            top_p: config.top_p,
            response_mime_type: request
                .expect_json
                .then(|| "application/json".to_string()),
        },
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: "BLOCK_NONE".to_string(),
            })
            .collect(),
    }
}

/// Classify a decoded response into text, a block, or an empty answer
pub fn interpret_response(
    response: GenerateContentResponse,
) -> std::result::Result<String, GenerationError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(GenerationError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match candidate.finish_reason {
        Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) => {
            Err(GenerationError::Blocked(reason))
        }
        _ => Err(GenerationError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use summariser_common::GenerationConfig;

    fn decode(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_interpret_joins_text_parts() {
        let response = decode(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"A short "},{"text":"summary."}]},"finishReason":"STOP"}]}"#,
        );
        assert_eq!(interpret_response(response).unwrap(), "A short summary.");
    }

    #[test]
    fn test_interpret_prompt_block() {
        let response = decode(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
        assert_eq!(
            interpret_response(response),
            Err(GenerationError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn test_interpret_safety_finish_without_text() {
        let response = decode(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert_eq!(
            interpret_response(response),
            Err(GenerationError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn test_interpret_empty() {
        assert_eq!(
            interpret_response(decode("{}")),
            Err(GenerationError::EmptyResponse)
        );

        let response = decode(
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}]},"finishReason":"MAX_TOKENS"}]}"#,
        );
        assert_eq!(interpret_response(response), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest::new("hello", GenerationConfig::default()).expect_json(true);
        let body = serde_json::to_value(request_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");

        let plain = GenerateRequest::new("hello", GenerationConfig::default());
        let body = serde_json::to_value(request_body(&plain)).unwrap();
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_endpoint() {
        let client =
            GeminiClient::new("https://example.test/v1beta/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_provider_error() {
        let client = GeminiClient::new("http://127.0.0.1:9", "key", Duration::from_secs(2)).unwrap();
        let request = GenerateRequest::new("hello", GenerationConfig::default());

        let result = client.generate(request).await;
        assert!(matches!(result, Err(GenerationError::Provider(_))));
    }
}
