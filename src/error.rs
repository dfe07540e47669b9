//! Error types for the Union Catalog client

use thiserror::Error;

use crate::models::status::{RegistrationAction, RegistrationStatus};

/// Coarse failure classes surfaced to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Timeout,
    BackendRejected,
    MalformedResponse,
    Validation,
    Conflict,
    NotAuthorized,
    Internal,
}

/// Main application error type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Backend rejected request: {message}")]
    BackendRejected { status: Option<u16>, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot {action} a registration that is {from}")]
    InvalidTransition {
        from: RegistrationStatus,
        action: RegistrationAction,
    },

    #[error("An action is already in progress for {0}")]
    ActionInProgress(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub const TIMEOUT_MESSAGE: &str = "Request timed out.";
pub const UNREACHABLE_MESSAGE: &str = "Cannot reach the server.";
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Network(_) => ErrorKind::Network,
            AppError::Timeout => ErrorKind::Timeout,
            AppError::BackendRejected { .. } => ErrorKind::BackendRejected,
            AppError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            AppError::Validation(_) | AppError::InvalidTransition { .. } => ErrorKind::Validation,
            AppError::ActionInProgress(_) => ErrorKind::Conflict,
            AppError::Authentication(_) | AppError::Authorization(_) => ErrorKind::NotAuthorized,
            AppError::Session(_) | AppError::Config(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to the operator. Never a raw transport dump.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => UNREACHABLE_MESSAGE.to_string(),
            AppError::Timeout => TIMEOUT_MESSAGE.to_string(),
            AppError::BackendRejected { message, .. } => message.clone(),
            AppError::MalformedResponse(_) => INVALID_RESPONSE_MESSAGE.to_string(),
            AppError::Validation(msg)
            | AppError::Authentication(msg)
            | AppError::Authorization(msg) => msg.clone(),
            AppError::InvalidTransition { .. } | AppError::ActionInProgress(_) => self.to_string(),
            AppError::Session(_) | AppError::Config(_) | AppError::Internal(_) => {
                UNEXPECTED_MESSAGE.to_string()
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            tracing::warn!("Request timed out: {}", e);
            AppError::Timeout
        } else if e.is_connect() || e.is_request() {
            tracing::error!("Cannot reach the server: {}", e);
            AppError::Network(e.to_string())
        } else if e.is_decode() || e.is_body() {
            tracing::error!("Failed to decode response: {}", e);
            AppError::MalformedResponse(e.to_string())
        } else if let Some(status) = e.status() {
            AppError::BackendRejected {
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or(UNEXPECTED_MESSAGE)
                    .to_string(),
            }
        } else {
            tracing::error!("Unexpected HTTP client error: {:?}", e);
            AppError::Internal(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::MalformedResponse(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .collect::<Vec<_>>()
            .join("; ");
        if message.is_empty() {
            AppError::Validation(errors.to_string())
        } else {
            AppError::Validation(message)
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_is_generic() {
        assert_eq!(AppError::Timeout.user_message(), "Request timed out.");
        assert_eq!(AppError::Timeout.kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_backend_message_passes_through() {
        let err = AppError::BackendRejected {
            status: Some(404),
            message: "Not found".to_string(),
        };
        assert_eq!(err.user_message(), "Not found");
        assert_eq!(err.kind(), ErrorKind::BackendRejected);
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let err = AppError::Internal("stack trace here".to_string());
        assert_eq!(err.user_message(), UNEXPECTED_MESSAGE);
        let err = AppError::Network("dns error: no such host".to_string());
        assert_eq!(err.user_message(), UNREACHABLE_MESSAGE);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = AppError::InvalidTransition {
            from: RegistrationStatus::Banned,
            action: RegistrationAction::Decline,
        };
        assert_eq!(err.user_message(), "Cannot decline a registration that is Banned");
    }
}
