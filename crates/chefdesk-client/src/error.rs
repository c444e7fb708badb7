//! # Client Error Types
//!
//! Error types for backend access.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend answer      │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Unauthorized           │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  NotFound               │ │
//! │  │  ConfigLoad/Save│  │                 │  │  Http { status }        │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │    Session      │  │               Payloads                       │  │
//! │  │                 │  │                                              │  │
//! │  │  NoSession      │  │  SerializationFailed                         │  │
//! │  │  SessionStore   │  │  DeserializationFailed                       │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Every way a backend call can fail.
///
/// ## Design Principles
/// - Each variant carries enough context to log
/// - Categorisers below drive how the app reacts
/// - All variants are `Send + Sync` for async use
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Backend URL could not be parsed or joined.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("Request timed out: {0}")]
    Timeout(String),

    // =========================================================================
    // Backend Answers
    // =========================================================================
    /// Credentials rejected or token missing/expired (401/403).
    ///
    /// ## When This Occurs
    /// - Wrong email or password on login
    /// - `me()` with a stale token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A token-bearing call was made with no token held.
    #[error("No active session")]
    NoSession,

    /// The collection or record does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Failed to encode a request body.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The backend answered with a body we could not decode.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    // =========================================================================
    // Session Store Errors
    // =========================================================================
    /// Reading or writing the persisted token failed.
    #[error("Session store error: {0}")]
    SessionStoreFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_decode() {
            ClientError::DeserializationFailed(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ClientError::DeserializationFailed(err.to_string())
        } else {
            ClientError::SerializationFailed(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the backend rejected who we are.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::NoSession)
    }

    /// Returns true if the backend could not be reached at all.
    pub fn is_connectivity_error(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectionFailed(_) | ClientError::Timeout(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Maps a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let message = body.into();
        match status {
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Http { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(ClientError::from_status(401, "bad creds").is_auth_error());
        assert!(ClientError::from_status(403, "").is_auth_error());
        assert!(matches!(
            ClientError::from_status(404, "no such collection"),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(500, "boom"),
            ClientError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_categories() {
        assert!(ClientError::ConnectionFailed("refused".into()).is_connectivity_error());
        assert!(ClientError::Timeout("health".into()).is_connectivity_error());
        assert!(!ClientError::NoSession.is_connectivity_error());
        assert!(ClientError::NoSession.is_auth_error());
        assert!(ClientError::InvalidUrl("x".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Http {
            status: 422,
            message: "name should not be empty".into(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 422: name should not be empty"
        );
    }

    #[test]
    fn test_json_error_is_deserialization() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(
            ClientError::from(err),
            ClientError::DeserializationFailed(_)
        ));
    }
}
