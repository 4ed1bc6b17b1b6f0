pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use self::config::{api_key_from_env, AppConfig, GenerationConfig, RateLimitSettings};
pub use self::error::{GenerationError, ParseError, SummariserError};
pub type Result<T> = std::result::Result<T, SummariserError>;
