//! Error types for myGengo API operations

use thiserror::Error;

/// Errors raised by the myGengo client
#[derive(Error, Debug)]
pub enum GengoError {
    /// Credentials were missing, malformed or rejected by the service
    #[error("Authentication error {code}: {message}")]
    AuthenticationError {
        /// Service error code, or the HTTP status
        code: i64,
        /// Human-readable description
        message: String,
    },

    /// Request parameters were rejected, either locally or by the service
    #[error("Validation error: {message}")]
    ValidationError {
        /// Service error code; `None` when rejected locally
        code: Option<i64>,
        /// Human-readable description
        message: String,
    },

    /// The requested job, revision or group is unknown to the service
    #[error("Not found {code}: {message}")]
    NotFoundError {
        /// Service error code, or the HTTP status
        code: i64,
        /// Human-readable description
        message: String,
    },

    /// The request could not be completed at the HTTP level
    #[error("Transport error: {message}")]
    TransportError {
        /// HTTP status, if a response arrived
        status: Option<u16>,
        /// Human-readable description
        message: String,
    },

    /// The response body was not the JSON we expected
    #[error("Decode error: {message}")]
    DecodeError {
        /// Human-readable description
        message: String,
    },

    /// A well-formed error response from the service
    #[error("Error {code}: {message}")]
    RemoteError {
        /// Service error code
        code: i64,
        /// Human-readable description
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable description
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GengoError {
    /// Build a validation error that never reached the service
    pub fn invalid(message: impl Into<String>) -> Self {
        GengoError::ValidationError {
            code: None,
            message: message.into(),
        }
    }

    /// Build a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        GengoError::DecodeError {
            message: message.into(),
        }
    }

    /// Remote error code, if the service reported one
    pub fn code(&self) -> Option<i64> {
        match self {
            GengoError::AuthenticationError { code, .. }
            | GengoError::NotFoundError { code, .. }
            | GengoError::RemoteError { code, .. } => Some(*code),
            GengoError::ValidationError { code, .. } => *code,
            _ => None,
        }
    }

    /// Whether a request failing with this error may be sent again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GengoError::TransportError {
                status: Some(500) | Some(503),
                ..
            }
        )
    }
}

impl From<reqwest::Error> for GengoError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Couldn't connect: {}", err)
        } else {
            err.to_string()
        };

        GengoError::TransportError {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}

impl From<serde_json::Error> for GengoError {
    fn from(err: serde_json::Error) -> Self {
        GengoError::DecodeError {
            message: format!("Couldn't parse JSON: {}", err),
        }
    }
}

impl From<config::ConfigError> for GengoError {
    fn from(err: config::ConfigError) -> Self {
        GengoError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Result type for myGengo operations
pub type Result<T> = std::result::Result<T, GengoError>;
