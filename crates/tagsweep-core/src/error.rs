//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Tagsweep.
///
/// Store-level variants (`Backend`, `Timeout`) never leave the association
/// store; they are logged there and replaced by a neutral default. Only the
/// transport-boundary variants reach an external caller.
#[derive(Error, Debug)]
pub enum TagsweepError {
    // ============ Transport Boundary Errors ============
    /// Validation error (malformed invalidation or index payload)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid shared secret
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Operation disabled by configuration
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ============ Infrastructure Errors ============
    /// Association store backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Downstream cache error
    #[error("Downstream cache error: {message}")]
    Downstream { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TagsweepError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Timeout(_) => 503,
            Self::Downstream { .. } => 502,
            Self::Backend(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Backend(_) => "BACKEND_UNAVAILABLE",
            Self::Downstream { .. } => "DOWNSTREAM_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend<T: Into<String>>(message: T) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a downstream cache error.
    #[must_use]
    pub fn downstream<T: Into<String>>(message: T) -> Self {
        Self::Downstream {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for TagsweepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `TagsweepError`.
    #[must_use]
    pub fn from_error(error: &TagsweepError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&TagsweepError> for ErrorResponse {
    fn from(error: &TagsweepError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(TagsweepError::validation("empty tags").status_code(), 422);
        assert_eq!(TagsweepError::unauthorized("bad secret").status_code(), 401);
        assert_eq!(TagsweepError::Forbidden("flush disabled".to_string()).status_code(), 403);
        assert_eq!(TagsweepError::backend("down").status_code(), 500);
        assert_eq!(TagsweepError::downstream("502 from purge").status_code(), 502);
        assert_eq!(TagsweepError::Timeout("t".to_string()).status_code(), 503);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(TagsweepError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(TagsweepError::unauthorized("x").error_code(), "UNAUTHORIZED");
        assert_eq!(TagsweepError::backend("x").error_code(), "BACKEND_UNAVAILABLE");
        assert_eq!(TagsweepError::internal("x").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_error_response_from_error() {
        let err = TagsweepError::unauthorized("missing secret");
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "UNAUTHORIZED");
        assert!(response.message.contains("missing secret"));
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = TagsweepError::validation("bad input");
        let details = vec![FieldError {
            field: "tags".to_string(),
            message: "At least one tag is required".to_string(),
            code: "length".to_string(),
        }];
        let response = ErrorResponse::from(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
