//! # Error Types Module
//!
//! Structured errors for startup configuration. Runtime failures in handlers
//! and the repository are carried as `anyhow::Error` with context.

/// Errors raised while loading the bot configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    Missing(&'static str),
    /// A variable is present but cannot be parsed
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing configuration: {key} must be set"),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid configuration: {key} has unusable value '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
