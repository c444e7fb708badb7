//! # App Error Type
//!
//! The one error type the front end shows to a person.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in ChefDesk                               │
//! │                                                                         │
//! │  Command                     Orchestrator                               │
//! │  ───────                     ────────────                               │
//! │                                                                         │
//! │  restaurant Chez Ferris                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  AppState::create_restaurant                                     │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation Error? ─── ValidationError::Required ───┐            │  │
//! │  │         │                                           │            │  │
//! │  │         ▼                                           ▼            │  │
//! │  │  Backend Error? ─── ClientError::Http { 500 } ──── AppError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  AppError ──► tracing::error! (code + message)                          │
//! │           └─► Alerts::alert (message only)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details (status bodies, decode errors) are logged where the
//! conversion happens; the message kept here is safe to show.

use chefdesk_client::ClientError;
use chefdesk_core::{CoreError, ValidationError};
use serde::Serialize;

/// Result type alias for app operations.
pub type AppResult<T> = Result<T, AppError>;

/// Error surfaced to the person at the terminal.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "price must not be negative"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found (404)
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Bad credentials or no session (401/403)
    Unauthorized,

    /// Backend unreachable or too slow
    Connectivity,

    /// Backend answered with an error
    BackendError,

    /// Configuration problem
    Config,

    /// Anything else
    Internal,
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

/// Converts backend access errors to app errors.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(msg) => {
                tracing::debug!("Backend refused the request: {}", msg);
                AppError::unauthorized("Not authorized")
            }
            ClientError::NoSession => AppError::unauthorized("Not logged in"),
            ClientError::NotFound(what) => {
                AppError::new(ErrorCode::NotFound, format!("Not found: {}", what))
            }
            ClientError::ConnectionFailed(e) => {
                tracing::error!("Backend connection failed: {}", e);
                AppError::new(ErrorCode::Connectivity, "Cannot reach the backend")
            }
            ClientError::Timeout(e) => {
                tracing::error!("Backend request timed out: {}", e);
                AppError::new(ErrorCode::Connectivity, "The backend did not answer in time")
            }
            ClientError::Http { status, message } => {
                // Log the body but return a generic message
                tracing::error!(status, "Backend error: {}", message);
                AppError::new(
                    ErrorCode::BackendError,
                    format!("The backend rejected the request ({})", status),
                )
            }
            ClientError::SerializationFailed(e) | ClientError::DeserializationFailed(e) => {
                tracing::error!("Payload error: {}", e);
                AppError::internal("Unexpected data from the backend")
            }
            ClientError::SessionStoreFailed(e) => {
                tracing::error!("Session store error: {}", e);
                AppError::internal("Could not store the session")
            }
            ClientError::InvalidConfig(msg)
            | ClientError::InvalidUrl(msg)
            | ClientError::ConfigLoadFailed(msg)
            | ClientError::ConfigSaveFailed(msg) => AppError::new(ErrorCode::Config, msg),
        }
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidTransition { from, to } => {
                tracing::error!(%from, %to, "Rejected screen transition");
                AppError::internal(format!("Cannot move from {} to {}", from, to))
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_codes() {
        let err: AppError = ClientError::from_status(401, "bad token").into();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err: AppError = ClientError::ConnectionFailed("refused".into()).into();
        assert_eq!(err.code, ErrorCode::Connectivity);

        let err: AppError = ClientError::from_status(500, "stack trace").into();
        assert_eq!(err.code, ErrorCode::BackendError);
        assert!(!err.message.contains("stack trace"));
    }

    #[test]
    fn test_validation_errors_keep_their_message() {
        let err: AppError = ValidationError::Negative {
            field: "price".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "price must not be negative");

        let err: AppError = CoreError::Validation(ValidationError::Required {
            field: "name".to_string(),
        })
        .into();
        assert_eq!(err.message, "name is required");
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::validation("name is required");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            serde_json::json!({ "code": "VALIDATION_ERROR", "message": "name is required" })
        );
    }
}
