//! Error types surfaced by the gateway and the state controllers.

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Result alias for client operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors produced while talking to the AMC API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed before a response was received")]
    Network {
        /// Request path.
        path: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("server responded with an error status")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the response body, or a generic fallback.
        message: String,
    },
    /// A success response body could not be decoded.
    #[error("failed to decode response body")]
    Decode {
        /// Request path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A request body could not be serialized.
    #[error("failed to encode request body")]
    Encode {
        /// Request path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The base URL and path did not form a valid URL.
    #[error("invalid request URL")]
    InvalidUrl {
        /// Joined URL that failed to parse.
        url: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },
    /// Input was rejected before any request was sent.
    #[error("input failed validation")]
    Validation(#[from] ValidationErrors),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// Message supplied by the server body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Operator-facing description of the failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => "Unable to reach the server".to_string(),
            Self::Http { message, .. } => message.clone(),
            Self::Decode { .. } => "Unexpected response from the server".to_string(),
            Self::Encode { .. } => "Request could not be encoded".to_string(),
            Self::InvalidUrl { url, .. } => format!("Invalid API address: {url}"),
            Self::Validation(errors) => errors.summary(),
            Self::ClientBuild { .. } => "HTTP client could not be initialised".to_string(),
        }
    }

    /// Server message when present, `fallback` otherwise.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Validation(errors) => errors.summary(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_expose_status_and_message() {
        let err = ApiError::Http {
            status: 401,
            message: "jwt expired".to_string(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.server_message(), Some("jwt expired"));
        assert_eq!(err.user_message(), "jwt expired");
        assert_eq!(err.message_or("Failed to fetch clients"), "jwt expired");
    }

    #[test]
    fn non_http_errors_fall_back() {
        let source = serde_json::from_str::<u32>("nope").expect_err("invalid json");
        let err = ApiError::Decode {
            path: "/clients".to_string(),
            source,
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
        assert_eq!(err.message_or("Failed to fetch clients"), "Failed to fetch clients");
        assert_eq!(err.to_string(), "failed to decode response body");
    }

    #[test]
    fn validation_errors_summarise_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("email", "Invalid email");
        let err = ApiError::from(errors);
        assert_eq!(err.user_message(), "email: Invalid email");
    }
}
