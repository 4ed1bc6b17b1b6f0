//! Schema validation of raw model output
//!
//! Model text is untrusted. Every shape problem is reported as a
//! [`ParseError`]; nothing in here panics on malformed input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use summariser_common::ParseError;

use crate::prompts::PromptKind;

/// Validated endpoint result, serialized as the response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredResult {
    Summary { summary: String },
    KeyPoints { keypoints: Vec<String> },
}

impl StructuredResult {
    /// Characters of generated content, for logging
    pub fn char_len(&self) -> usize {
        match self {
            Self::Summary { summary } => summary.chars().count(),
            Self::KeyPoints { keypoints } => keypoints.iter().map(|k| k.chars().count()).sum(),
        }
    }
}

/// Parse raw model text into the result shape required by `kind`
pub fn parse(kind: PromptKind, raw: &str) -> Result<StructuredResult, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    match kind {
        PromptKind::Summary => parse_summary(trimmed),
        PromptKind::KeyPoints => parse_keypoints(trimmed),
    }
}

fn parse_summary(text: &str) -> Result<StructuredResult, ParseError> {
    // prose may legitimately contain braces, so only whole-text or fenced JSON counts
    let Some(object) = locate_json_object(text, false) else {
        return Ok(StructuredResult::Summary {
            summary: text.to_string(),
        });
    };

    match object.get("summary") {
        Some(Value::String(summary)) if !summary.trim().is_empty() => Ok(StructuredResult::Summary {
            summary: summary.trim().to_string(),
        }),
        Some(Value::String(_)) => Err(ParseError::Empty),
        Some(_) => Err(ParseError::WrongType {
            field: "summary",
            expected: "a string",
        }),
        None => Err(ParseError::MissingField("summary")),
    }
}

fn parse_keypoints(text: &str) -> Result<StructuredResult, ParseError> {
    let object = locate_json_object(text, true).ok_or(ParseError::NoJsonObject)?;

    let wrong_type = ParseError::WrongType {
        field: "keypoints",
        expected: "an array of strings",
    };

    let items = match object.get("keypoints") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(wrong_type),
        None => return Err(ParseError::MissingField("keypoints")),
    };

    let keypoints = items
        .iter()
        .map(|item| item.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<Vec<_>>>()
        .ok_or(wrong_type)?;

    Ok(StructuredResult::KeyPoints { keypoints })
}

/// Find a JSON object in model text.
///
/// Tried in order: the whole text, the first fenced code block, and (when
/// `allow_embedded`) the span from the first `{` to the last `}`.
fn locate_json_object(text: &str, allow_embedded: bool) -> Option<Map<String, Value>> {
    let mut candidates = vec![text];

    if let Some(block) = fenced_block(text) {
        candidates.push(block);
    }

    if allow_embedded {
        if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
            if start < end {
                candidates.push(&text[start..=end]);
            }
        }
    }

    candidates
        .into_iter()
        .find_map(|candidate| match serde_json::from_str::<Value>(candidate.trim()) {
            Ok(Value::Object(object)) => Some(object),
            _ => None,
        })
}

/// Body of the first ``` fenced block, without the language tag
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // skip the info string ("json", "yaml", ...) up to the end of the line
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}
