//! Error types for settings loading.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field (environment variable) that failed validation.
        field: String,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// API base URL could not be parsed.
    #[error("invalid API URL")]
    InvalidUrl {
        /// URL payload provided by the caller.
        value: String,
        /// Source parse error.
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Render the error together with its context fields.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidField {
                field,
                value,
                reason,
            } => match value {
                Some(value) => format!("{self}: {field}={value} ({reason})"),
                None => format!("{self}: {field} ({reason})"),
            },
            Self::InvalidUrl { value, source } => format!("{self}: '{value}' ({source})"),
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
