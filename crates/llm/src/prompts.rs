//! Prompt templates for the summary and key-point endpoints

/// Endpoint flavour; selects template, format instructions and parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Summary,
    KeyPoints,
}

impl PromptKind {
    /// Stable name used as the rate-limit key and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summarize",
            Self::KeyPoints => "keypoints",
        }
    }

    /// Whether the provider should be asked for JSON output
    pub fn expects_json(&self) -> bool {
        matches!(self, Self::KeyPoints)
    }
}

/// Free-text summary template
pub const SUMMARY_PROMPT: &str = "Please provide a concise summary of the following text.
Focus on key points and main ideas.
Return only the summary text without any introductory phrases.
{format_instructions}
Text:
{text}
";

/// Key-point extraction template
pub const KEYPOINTS_PROMPT: &str = "Extract the key points of the following text.
Each key point must be a short sentence taken verbatim, or nearly verbatim, from the text,
listed in the order in which it appears.
{format_instructions}
Text:
{text}
";

const KEYPOINTS_FORMAT_INSTRUCTIONS: &str = r#"Respond with a JSON object that has exactly one field, "keypoints", whose value is an array of strings.
Example: {"keypoints": ["First key point.", "Second key point."]}
If the text has no key points, respond with {"keypoints": []}.
Return only the JSON object, without code fences or commentary.
"#;

/// Output format instructions embedded into the prompt for `kind`
pub fn format_instructions(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::Summary => "",
        PromptKind::KeyPoints => KEYPOINTS_FORMAT_INSTRUCTIONS,
    }
}

/// Render the prompt for `kind`
pub fn build(kind: PromptKind, text: &str, format_instructions: &str) -> String {
    let template = match kind {
        PromptKind::Summary => SUMMARY_PROMPT,
        PromptKind::KeyPoints => KEYPOINTS_PROMPT,
    };

    // user text goes in last so placeholders inside it stay literal
    template
        .replacen("{format_instructions}", format_instructions, 1)
        .replacen("{text}", text, 1)
}
