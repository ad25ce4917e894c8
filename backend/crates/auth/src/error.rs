//! Auth Error Types
//!
//! This module provides relay-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Relay error variants
///
/// Backend answers such as 401 or 422 are not errors here: they are relayed
/// verbatim as responses. These variants cover what the edge itself cannot do.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend unreachable, timed out, or refused to issue a token
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Backend kept rejecting the anti-forgery token after a refresh
    #[error("Anti-forgery token rejected after refresh")]
    TokenMismatch,

    /// Backend body could not be decoded
    #[error("Malformed upstream response: {0}")]
    MalformedUpstream(String),

    /// Operation needs a session cookie and the browser sent none
    #[error("Session not found")]
    SessionMissing,

    /// Local form validation failed
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: serde_json::Value,
    },

    /// Browser request body could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UpstreamUnavailable(_) | AuthError::TokenMismatch => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AuthError::SessionMissing => StatusCode::UNAUTHORIZED,
            AuthError::Validation { .. } | AuthError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::MalformedUpstream(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UpstreamUnavailable(_) | AuthError::TokenMismatch => {
                ErrorKind::ServiceUnavailable
            }
            AuthError::SessionMissing => ErrorKind::Unauthorized,
            AuthError::Validation { .. } | AuthError::InvalidRequest(_) => ErrorKind::BadRequest,
            AuthError::MalformedUpstream(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Message safe to show in the browser
    ///
    /// Upstream and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::UpstreamUnavailable(_) | AuthError::TokenMismatch => {
                "Authentication service is temporarily unavailable".to_string()
            }
            AuthError::SessionMissing => "Session not found. Please sign in again.".to_string(),
            AuthError::Validation { message, .. } => message.clone(),
            AuthError::InvalidRequest(_) => "Invalid request body".to_string(),
            AuthError::MalformedUpstream(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.public_message());
        match self {
            AuthError::Validation { errors, .. } => err.with_errors(errors.clone()),
            AuthError::UpstreamUnavailable(_) | AuthError::TokenMismatch => {
                err.with_action("Please try again in a moment")
            }
            AuthError::SessionMissing => err.with_action("Sign in again"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::UpstreamUnavailable(cause) => {
                tracing::error!(cause = %cause, "Authentication backend unavailable");
            }
            AuthError::TokenMismatch => {
                tracing::warn!("Anti-forgery token rejected twice");
            }
            AuthError::MalformedUpstream(cause) => {
                tracing::error!(cause = %cause, "Malformed response from authentication backend");
            }
            AuthError::Config(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Relay internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Relay error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Config(err.to_string())
    }
}

impl From<platform::client::ClientError> for AuthError {
    fn from(err: platform::client::ClientError) -> Self {
        AuthError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_unavailable_hides_cause() {
        let err = AuthError::UpstreamUnavailable("connection refused (os error 111)".into());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!err.public_message().contains("os error"));
        assert!(!err.to_app_error().message().contains("refused"));
    }

    #[test]
    fn test_validation_carries_field_errors() {
        let err = AuthError::Validation {
            message: "Passwords do not match".into(),
            errors: serde_json::json!({ "passwordConfirmation": ["Passwords do not match"] }),
        };
        let app_err = err.to_app_error();
        assert_eq!(app_err.status_code(), 400);
        assert!(app_err.errors().is_some());
    }

    #[test]
    fn test_kind_matches_status() {
        for err in [
            AuthError::TokenMismatch,
            AuthError::SessionMissing,
            AuthError::InvalidRequest("x".into()),
            AuthError::MalformedUpstream("x".into()),
        ] {
            assert_eq!(err.kind().status_code(), err.status_code().as_u16());
        }
    }
}
