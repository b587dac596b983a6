use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ================================
/// Full services configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServicesConfig {
    /// Tag used by the logging facade; the library default applies when absent.
    pub service_name: Option<String>,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
    #[serde(default)]
    pub token_keys: Vec<TokenKeyConfig>,
}

/// What `add_token_key` does when the key name is already registered.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyPolicy {
    /// Replace the previous validator silently.
    #[default]
    Overwrite,
    /// Keep the previous validator and fail with `DuplicateKey`.
    Reject,
}

/// ================================
/// Token keys
/// ================================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenKeyConfig {
    /// Storage key, also the registry key.
    /// Invariant: non-blank and unique within `token_keys`.
    pub name: String,
    #[serde(default)]
    pub format: TokenFormat,
}

/// Built-in token formats that can be declared in configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenFormat {
    /// Every string is accepted.
    Any,
    /// At least one non-whitespace character.
    #[default]
    NonEmpty,
    /// Starts with `prefix` and has something after it (API keys: `sk_...`).
    Prefix { prefix: String },
    /// Whole token matches the regular expression.
    Pattern { pattern: String },
    /// Three dot-separated base64url segments, JSON header and payload.
    Jwt {
        /// Also require a numeric `exp` claim in the future.
        #[serde(default)]
        require_unexpired: bool,
    },
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }

    /// `LOG_LEVEL` (default `info`) and `LOG_FORMAT` (default compact).
    pub fn from_env() -> Self {
        let level = std::env::var("LOG_LEVEL")
            .ok()
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(default_log_level);
        Self::new(level, LogFormat::from_env())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(default_log_level(), LogFormat::Compact)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Compact,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "compact".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
