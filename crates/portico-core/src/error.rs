//! Error types for the Portico pipeline.
//!
//! [`PorticoError`] is the *fault* channel only. Domain-validation
//! failures never travel here: the handler contract requires
//! `transform_request` to encode them as an in-band value that `respond`
//! maps to a status code. What remains for this type is the genuinely
//! exceptional: the document store being unreachable, a file read
//! failing, a collaborator misbehaving. The boundary layer maps any fault
//! that escapes the pipeline to a 500-class response without leaking
//! internals.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`PorticoError`].
pub type PorticoResult<T> = Result<T, PorticoError>;

/// Categories of errors for classification and status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Request validation errors.
    Validation,
    /// Authentication errors (invalid/missing credentials).
    Authentication,
    /// Authorization errors (permission denied).
    Authorization,
    /// Resource not found.
    NotFound,
    /// Internal server errors.
    Internal,
    /// External collaborator errors (data store, notification sender).
    External,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Authentication | Self::Authorization => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::External => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Standard fault type for the Portico pipeline.
///
/// # Example
///
/// ```
/// use portico_core::PorticoError;
///
/// fn load_record(id: &str) -> Result<(), PorticoError> {
///     Err(PorticoError::external("document store unreachable"))
/// }
/// ```
#[derive(Error, Debug)]
pub enum PorticoError {
    /// Request validation failed in a way that could not be encoded
    /// in-band (malformed beyond recovery).
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable error message.
        message: String,
    },

    /// Authentication failed.
    #[error("authentication error: {message}")]
    Authentication {
        /// Human-readable error message.
        message: String,
    },

    /// Authorization denied.
    #[error("authorization denied: {message}")]
    Authorization {
        /// Human-readable error message.
        message: String,
    },

    /// Resource not found.
    #[error("not found: {message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// Internal fault. The source is logged but never exposed to clients.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External collaborator fault.
    #[error("external service error: {message}")]
    External {
        /// Human-readable error message.
        message: String,
    },
}

impl PorticoError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an internal error with no source.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping a source error.
    pub fn internal_with(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an external collaborator error.
    pub fn external(message: impl Into<String>) -> Self {
        Self::External {
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Authentication { .. } => ErrorCategory::Authentication,
            Self::Authorization { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Internal { .. } => ErrorCategory::Internal,
            Self::External { .. } => ErrorCategory::External,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the message safe to show a client.
    ///
    /// Internal and external fault details stay in the logs.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Validation { message }
            | Self::Authentication { message }
            | Self::Authorization { message }
            | Self::NotFound { message } => message,
            Self::Internal { .. } => "internal server error",
            Self::External { .. } => "upstream service unavailable",
        }
    }

    /// Serializes the client-facing JSON error envelope.
    #[must_use]
    pub fn error_body(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.category(),
                "message": self.public_message(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_status_mapping() {
        assert_eq!(
            PorticoError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PorticoError::authorization("nope").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PorticoError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PorticoError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PorticoError::external("down").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = PorticoError::internal_with(
            "store write failed",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(err.public_message(), "internal server error");
        let body = err.error_body();
        assert_eq!(body["error"]["code"], "internal");
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[test]
    fn test_validation_message_shown() {
        let err = PorticoError::validation("title is required");
        assert_eq!(err.error_body()["error"]["message"], "title is required");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let err = PorticoError::internal_with(
            "store write failed",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert!(err.source().is_some());
        assert!(PorticoError::internal("plain").source().is_none());
    }
}
