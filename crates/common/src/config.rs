use crate::error::SummariserError;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "summariser.toml";

/// Environment variable holding the Gemini credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Sampling parameters sent with every generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider model identifier
    pub model_name: String,

    /// Temperature (0.0 - 1.0)
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,

    /// Top-p sampling
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_name: "gemini-1.5-flash".to_string(),
            temperature: 0.3,
            max_output_tokens: 1024,
            top_p: 0.95,
        }
    }
}

/// Fixed window admission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    /// Calls admitted per window
    pub max_calls: u32,

    /// Window length in seconds
    pub period_secs: u64,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_calls: 100,
            period_secs: 60,
        }
    }
}

impl RateLimitSettings {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

/// Summariser application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Worker threads (actix default when unset)
    pub workers: Option<usize>,

    /// Log level
    pub log_level: String,

    /// Log directory; console only when unset
    pub log_dir: Option<PathBuf>,

    /// Model and sampling parameters
    pub generation: GenerationConfig,

    /// Gemini REST API base URL
    pub api_base_url: String,

    /// Timeout for a single generation call
    pub request_timeout_secs: u64,

    /// Minimum sanitized text length in characters
    pub min_text_length: usize,

    /// Sanitized text is truncated to this many characters
    pub max_text_length: usize,

    /// Request body size limit in bytes
    pub max_body_bytes: usize,

    /// Per-endpoint fixed window
    pub rate_limit: RateLimitSettings,

    /// Origins allowed by CORS ("*" for any)
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 10000,
            workers: None,
            log_level: "info".to_string(),
            log_dir: None,
            generation: GenerationConfig::default(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: 60,
            min_text_length: 50,
            max_text_length: 10_000,
            max_body_bytes: 1024 * 1024,
            rate_limit: RateLimitSettings::default(),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional TOML file and
    /// `SUMMARISER_*` environment variables (in that order of precedence).
    ///
    /// With `path == None` the file `summariser.toml` is used if present.
    /// `.env` loading is left to the binary.
    pub fn load(path: Option<&Path>) -> Result<Self, SummariserError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix("SUMMARISER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors_allowed_origins"),
        );

        Self::build(builder)
    }

    /// Parse configuration from TOML text only (no file lookup, no env)
    pub fn from_toml_str(toml: &str) -> Result<Self, SummariserError> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SummariserError> {
        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SummariserError::config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SummariserError> {
        let generation = &self.generation;

        if generation.model_name.trim().is_empty() {
            return Err(SummariserError::config("Model name cannot be empty"));
        }

        if !(0.0..=1.0).contains(&generation.temperature) {
            return Err(SummariserError::config(format!(
                "Temperature must be within [0, 1], got {}",
                generation.temperature
            )));
        }

        if generation.max_output_tokens == 0 {
            return Err(SummariserError::config("max_output_tokens must be positive"));
        }

        if !(generation.top_p > 0.0 && generation.top_p <= 1.0) {
            return Err(SummariserError::config(format!(
                "top_p must be within (0, 1], got {}",
                generation.top_p
            )));
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(SummariserError::config(
                "API base URL must start with http:// or https://",
            ));
        }

        if self.min_text_length > self.max_text_length || self.max_text_length == 0 {
            return Err(SummariserError::config(format!(
                "Invalid text length bounds [{}, {}]",
                self.min_text_length, self.max_text_length
            )));
        }

        if self.rate_limit.max_calls == 0 || self.rate_limit.period_secs == 0 {
            return Err(SummariserError::config(
                "Rate limit max_calls and period_secs must be positive",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SummariserError::config("request_timeout_secs must be positive"));
        }

        if self.server_port == 0 {
            return Err(SummariserError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}

/// Read the Gemini API key from the process environment.
///
/// A missing or blank key is fatal at startup.
pub fn api_key_from_env() -> Result<String, SummariserError> {
    api_key_from(std::env::var(API_KEY_ENV).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, SummariserError> {
    match value.map(|v| v.trim().to_string()) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(SummariserError::config(format!(
            "{} environment variable not set",
            API_KEY_ENV
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server_port, 10000);
        assert_eq!(config.min_text_length, 50);
        assert_eq!(config.max_text_length, 10_000);
        assert_eq!(config.rate_limit.max_calls, 100);
        assert_eq!(config.rate_limit.period(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_bind_address() {
        let config = AppConfig::default();
        assert_eq!(config.server_bind_address(), "0.0.0.0:10000");
    }

    #[test]
    fn test_validate() {
        let mut config = AppConfig::default();
        config.generation.temperature = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.generation.max_output_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.rate_limit.max_calls = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.min_text_length = 200;
        config.max_text_length = 100;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.generation.model_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            server_port = 8081
            cors_allowed_origins = ["http://localhost:3000"]

            [generation]
            model_name = "gemini-1.5-pro"
            temperature = 0.7

            [rate_limit]
            max_calls = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server_port, 8081);
        assert_eq!(config.generation.model_name, "gemini-1.5-pro");
        assert_eq!(config.generation.temperature, 0.7);
        // untouched fields keep their defaults
        assert_eq!(config.generation.max_output_tokens, 1024);
        assert_eq!(config.rate_limit.max_calls, 5);
        assert_eq!(config.rate_limit.period_secs, 60);
        assert_eq!(config.cors_allowed_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_toml_invalid_values_rejected() {
        let result = AppConfig::from_toml_str("[generation]\ntemperature = 3.0\n");
        assert!(matches!(result, Err(SummariserError::Config(_))));
    }

    #[test]
    fn test_env_overrides_nested_and_list_keys() {
        let vars = [
            ("SUMMARISER_SERVER_PORT", "8081"),
            ("SUMMARISER_GENERATION__MODEL_NAME", "gemini-env"),
            ("SUMMARISER_RATE_LIMIT__MAX_CALLS", "7"),
            ("SUMMARISER_CORS_ALLOWED_ORIGINS", "http://a,http://b"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let result = AppConfig::load(None);

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let config = result.unwrap();
        assert_eq!(config.server_port, 8081);
        assert_eq!(config.generation.model_name, "gemini-env");
        assert_eq!(config.rate_limit.max_calls, 7);
        // untouched nested fields keep their defaults
        assert_eq!(config.generation.max_output_tokens, 1024);
        assert_eq!(config.rate_limit.period_secs, 60);
        assert_eq!(config.cors_allowed_origins, vec!["http://a", "http://b"]);
    }

    #[test]
    fn test_api_key() {
        assert_eq!(api_key_from(Some(" abc ".to_string())).unwrap(), "abc");
        assert!(api_key_from(Some("   ".to_string())).is_err());
        assert!(api_key_from(None).is_err());
    }
}
