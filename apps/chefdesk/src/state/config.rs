//! # Configuration State
//!
//! Everything the app reads at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--backend-url`, `--app-id`)
//! 2. Environment variables (`CHEFDESK_*`)
//! 3. Config file (`chefdesk.toml`)
//! 4. Defaults
//!
//! `[backend]` and `[session]` belong to the client crate; this module adds
//! the `[demo]` section read from the same file.
//!
//! ```toml
//! [demo]
//! email = "admin@manifest.build"
//! password = "admin"
//! ```
//!
//! Read-only after startup, so no lock.

use chefdesk_client::ClientConfig;
use chefdesk_core::{DEMO_EMAIL, DEMO_PASSWORD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{AppError, AppResult, ErrorCode};

/// Credentials behind "Login as Demo Chef".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSettings {
    #[serde(default = "default_demo_email")]
    pub email: String,

    #[serde(default = "default_demo_password")]
    pub password: String,
}

fn default_demo_email() -> String {
    DEMO_EMAIL.to_string()
}

fn default_demo_password() -> String {
    DEMO_PASSWORD.to_string()
}

impl Default for DemoSettings {
    fn default() -> Self {
        DemoSettings {
            email: default_demo_email(),
            password: default_demo_password(),
        }
    }
}

/// The part of the config file this crate owns.
#[derive(Debug, Default, Deserialize)]
struct AppSection {
    #[serde(default)]
    demo: DemoSettings,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigState {
    /// Backend and session settings.
    pub client: ClientConfig,

    /// Demo login credentials.
    pub demo: DemoSettings,
}

impl ConfigState {
    /// Loads file and environment, in that order, then validates.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let path = config_path.or_else(ClientConfig::default_config_path);
        let client = ClientConfig::load(path.clone())?;

        let mut demo = match path.as_deref() {
            Some(path) if path.exists() => Self::read_demo(path)?,
            _ => DemoSettings::default(),
        };
        Self::apply_demo_overrides(&mut demo, |key| std::env::var(key).ok());

        Ok(ConfigState { client, demo })
    }

    fn read_demo(path: &Path) -> AppResult<DemoSettings> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::new(ErrorCode::Config, format!("Failed to read config: {}", e)))?;
        Self::parse_demo(&contents)
    }

    fn parse_demo(contents: &str) -> AppResult<DemoSettings> {
        let section: AppSection = toml::from_str(contents)
            .map_err(|e| AppError::new(ErrorCode::Config, format!("Invalid [demo] section: {}", e)))?;
        Ok(section.demo)
    }

    /// Applies `CHEFDESK_DEMO_EMAIL` and `CHEFDESK_DEMO_PASSWORD`.
    fn apply_demo_overrides<F>(demo: &mut DemoSettings, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(email) = lookup("CHEFDESK_DEMO_EMAIL") {
            debug!(email = %email, "Overriding demo email from environment");
            demo.email = email;
        }

        if let Some(password) = lookup("CHEFDESK_DEMO_PASSWORD") {
            demo.password = password;
        }
    }

    /// Applies command-line flags on top of file and environment.
    pub fn apply_flags(
        &mut self,
        backend_url: Option<String>,
        app_id: Option<String>,
    ) -> AppResult<()> {
        if let Some(url) = backend_url {
            self.client.backend.url = url;
        }
        if let Some(app_id) = app_id {
            self.client.backend.app_id = Some(app_id);
        }
        self.client.validate()?;
        Ok(())
    }

    /// Timeout of the startup health probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.client.backend.probe_timeout_secs)
    }

    /// Admin panel link shown on every screen.
    pub fn admin_url(&self) -> String {
        self.client.admin_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_use_seeded_admin() {
        let config = ConfigState::default();
        assert_eq!(config.demo.email, "admin@manifest.build");
        assert_eq!(config.demo.password, "admin");
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.admin_url(), "http://localhost:1111/admin");
    }

    #[test]
    fn test_demo_section_is_optional() {
        let demo = ConfigState::parse_demo("[backend]\nurl = \"http://x.test\"\n").unwrap();
        assert_eq!(demo, DemoSettings::default());

        let demo = ConfigState::parse_demo("[demo]\nemail = \"chef@example.com\"\n").unwrap();
        assert_eq!(demo.email, "chef@example.com");
        assert_eq!(demo.password, "admin");
    }

    #[test]
    fn test_demo_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CHEFDESK_DEMO_EMAIL", "sous@example.com"),
            ("CHEFDESK_DEMO_PASSWORD", "secret"),
        ]
        .into_iter()
        .collect();

        let mut demo = DemoSettings::default();
        ConfigState::apply_demo_overrides(&mut demo, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(demo.email, "sous@example.com");
        assert_eq!(demo.password, "secret");
    }

    #[test]
    fn test_flags_are_validated() {
        let mut config = ConfigState::default();
        config
            .apply_flags(Some("https://food.example.com".into()), Some("kitchen".into()))
            .unwrap();
        assert_eq!(config.admin_url(), "https://food.example.com/admin");
        assert_eq!(config.client.backend.app_id.as_deref(), Some("kitchen"));

        let err = config.apply_flags(Some("ftp://nope".into()), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::Config);
    }

    #[test]
    fn test_load_reads_both_sections() {
        let dir = std::env::temp_dir().join(format!("chefdesk-app-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("chefdesk.toml");
        std::fs::write(
            &path,
            "[backend]\nper_page = 20\n\n[demo]\npassword = \"hunter2\"\n",
        )
        .unwrap();

        let config = ConfigState::load(Some(path)).unwrap();
        assert_eq!(config.client.backend.per_page, Some(20));
        if std::env::var("CHEFDESK_DEMO_PASSWORD").is_err() {
            assert_eq!(config.demo.password, "hunter2");
        }

        std::fs::remove_dir_all(dir).unwrap();
    }
}
