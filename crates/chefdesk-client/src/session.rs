//! # Session Token Store
//!
//! Holds the bearer token the backend hands out on login.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Token Lifecycle                                  │
//! │                                                                         │
//! │   startup ──► restore() ──► token from file (if persisting)            │
//! │                                                                         │
//! │   login   ──► set(token) ──► memory  (+ file when persisting)          │
//! │                                                                         │
//! │   request ──► get()      ──► Authorization: Bearer <token>             │
//! │                                                                         │
//! │   logout  ──► clear()    ──► memory emptied, file removed              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The token is opaque: there is no refresh and no expiry tracking. A stale
//! token shows up as `Unauthorized` on the next call.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Shared, optionally persisted bearer token.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    token: Arc<RwLock<Option<String>>>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Creates a store that keeps the token in memory only.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a store that mirrors the token to `path`.
    pub fn persisted(path: PathBuf) -> Self {
        TokenStore {
            token: Arc::new(RwLock::new(None)),
            path: Some(path),
        }
    }

    /// Creates a store from an optional persistence path.
    pub fn new(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::persisted(path),
            None => Self::in_memory(),
        }
    }

    /// Where the token is persisted, if anywhere.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Loads a previously persisted token into memory.
    ///
    /// Returns whether a token was found. A missing file is not an error.
    pub async fn restore(&self) -> ClientResult<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    return Ok(false);
                }
                *self.token.write().await = Some(token.to_string());
                debug!(?path, "Restored session token");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ClientError::SessionStoreFailed(e.to_string())),
        }
    }

    /// Stores a fresh token, writing it to disk when persisting.
    ///
    /// The in-memory token is set even if the file write fails.
    pub async fn set(&self, token: String) -> ClientResult<()> {
        *self.token.write().await = Some(token.clone());

        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ClientError::SessionStoreFailed(e.to_string()))?;
            }
            tokio::fs::write(path, token)
                .await
                .map_err(|e| ClientError::SessionStoreFailed(e.to_string()))?;
            info!(?path, "Session token persisted");
        }

        Ok(())
    }

    /// Current token, if any.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Current token, or `NoSession`.
    pub async fn require(&self) -> ClientResult<String> {
        self.get().await.ok_or(ClientError::NoSession)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Forgets the token and removes the persisted copy.
    pub async fn clear(&self) -> ClientResult<()> {
        *self.token.write().await = None;

        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(?path, "Removed persisted session token"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(?path, error = %e, "Failed to remove persisted session token");
                    return Err(ClientError::SessionStoreFailed(e.to_string()));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("chefdesk-test-{}", uuid::Uuid::new_v4()))
            .join("session.token")
    }

    #[tokio::test]
    async fn test_in_memory_lifecycle() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated().await);
        assert!(matches!(store.require().await, Err(ClientError::NoSession)));

        store.set("abc".to_string()).await.unwrap();
        assert_eq!(store.get().await.as_deref(), Some("abc"));

        store.clear().await.unwrap();
        assert!(store.get().await.is_none());
        assert!(!store.restore().await.unwrap());
    }

    #[tokio::test]
    async fn test_persisted_round_trip() {
        let path = temp_token_path();

        let store = TokenStore::persisted(path.clone());
        store.set("token-1".to_string()).await.unwrap();
        assert!(path.exists());

        let next_run = TokenStore::persisted(path.clone());
        assert!(next_run.restore().await.unwrap());
        assert_eq!(next_run.get().await.as_deref(), Some("token-1"));

        next_run.clear().await.unwrap();
        assert!(!path.exists());
        assert!(!TokenStore::persisted(path.clone()).restore().await.unwrap());

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_clones_share_token() {
        let store = TokenStore::in_memory();
        let clone = store.clone();
        store.set("shared".to_string()).await.unwrap();
        assert_eq!(clone.get().await.as_deref(), Some("shared"));
    }
}
