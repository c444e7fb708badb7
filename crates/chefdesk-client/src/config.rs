//! # Client Configuration
//!
//! Where the backend lives and how the session token is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the app)          │
//! │     --backend-url http://localhost:1111                                │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CHEFDESK_BACKEND_URL=https://api.example.com                       │
//! │     CHEFDESK_APP_ID=chefdesk                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/chefdesk/chefdesk.toml (Linux)                           │
//! │     ~/Library/Application Support/com.chefdesk.chefdesk/... (macOS)    │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     http://localhost:1111, prefix /api, in-memory session              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # chefdesk.toml
//! [backend]
//! url = "http://localhost:1111"
//! api_prefix = "/api"
//! app_id = "chefdesk"
//! probe_timeout_secs = 5
//!
//! [session]
//! persist = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// File name of the config file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "chefdesk.toml";

/// File name of the persisted session token inside the platform data directory.
pub const SESSION_FILE_NAME: &str = "session.token";

// =============================================================================
// Backend Settings
// =============================================================================

/// How to reach the managed backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the backend, without the API prefix.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Path prefix of the REST API (Manifest serves it under `/api`).
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Application id sent as `X-App-Id` on every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Timeout of the startup health probe (seconds).
    /// Data calls have no client-side timeout.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Page size asked for on list queries. Backend default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

fn default_backend_url() -> String {
    "http://localhost:1111".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_backend_url(),
            api_prefix: default_api_prefix(),
            app_id: None,
            probe_timeout_secs: default_probe_timeout(),
            per_page: None,
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// How the bearer token outlives the process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Keep the token in a file between runs.
    #[serde(default)]
    pub persist: bool,

    /// Token file location. Platform data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (chefdesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.backend.url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.url
            )));
        }

        let prefix = &self.backend.api_prefix;
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(ClientError::InvalidConfig(format!(
                "api_prefix must start with '/', got: {}",
                prefix
            )));
        }

        if self.backend.probe_timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "probe_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.backend.per_page == Some(0) {
            return Err(ClientError::InvalidConfig(
                "per_page must be greater than 0".into(),
            ));
        }

        if matches!(self.backend.app_id.as_deref(), Some(id) if id.trim().is_empty()) {
            return Err(ClientError::InvalidConfig("app_id must not be blank".into()));
        }

        Ok(())
    }

    /// Applies `CHEFDESK_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CHEFDESK_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Some(prefix) = lookup("CHEFDESK_API_PREFIX") {
            self.backend.api_prefix = prefix;
        }

        if let Some(app_id) = lookup("CHEFDESK_APP_ID") {
            debug!(app_id = %app_id, "Overriding app id from environment");
            self.backend.app_id = Some(app_id);
        }

        if let Some(timeout) = lookup("CHEFDESK_PROBE_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.backend.probe_timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid CHEFDESK_PROBE_TIMEOUT_SECS"),
            }
        }

        if let Some(persist) = lookup("CHEFDESK_SESSION_PERSIST") {
            match persist.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.session.persist = true,
                "0" | "false" | "no" | "off" => self.session.persist = false,
                _ => warn!(value = %persist, "Unknown session persist flag in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Root of the REST API: backend URL plus prefix, no trailing slash.
    pub fn api_base(&self) -> String {
        format!(
            "{}{}",
            self.backend.url.trim_end_matches('/'),
            self.backend.api_prefix.trim_end_matches('/')
        )
    }

    /// Link to the backend's admin panel.
    pub fn admin_url(&self) -> String {
        format!("{}/admin", self.backend.url.trim_end_matches('/'))
    }

    /// Where the session token is persisted, if persistence is on.
    pub fn session_path(&self) -> Option<PathBuf> {
        if !self.session.persist {
            return None;
        }
        self.session.path.clone().or_else(|| {
            project_dirs().map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
        })
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "chefdesk", "chefdesk")
}
