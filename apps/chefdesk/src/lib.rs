//! # ChefDesk Library
//!
//! Core library of the ChefDesk terminal application.
//! `run` is the entry point: it parses flags, configures logging, picks a
//! backend, and drives the command loop.
//!
//! ## Module Organization
//! ```text
//! chefdesk_lib/
//! ├── lib.rs          ◄─── You are here (flags, logging, startup, loop)
//! ├── alerts.rs       ◄─── User-visible failure channel
//! ├── error.rs        ◄─── AppError for everything the user sees
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── app.rs      ◄─── AppState: session and data orchestrator
//! │   └── config.rs   ◄─── ConfigState: file, env, flags
//! ├── screens/
//! │   ├── mod.rs      ◄─── Ui: mounting and rendering
//! │   ├── landing.rs  ◄─── Signed-out screen
//! │   └── dashboard.rs◄─── Restaurants, menus, forms
//! └── commands/
//!     ├── mod.rs      ◄─── Command parsing, Shell
//!     ├── session.rs  ◄─── demo, login, logout
//!     └── menu.rs     ◄─── restaurant, select, item.*, add-item, refresh
//! ```

pub mod alerts;
pub mod commands;
pub mod error;
pub mod screens;
pub mod state;

use anyhow::Context;
use chefdesk_client::{Backend, DataClient, HttpBackend, MemoryBackend};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use alerts::TerminalAlerts;
use commands::{Flow, Shell};
use screens::Ui;
use state::{AppState, ConfigState};

// =============================================================================
// Command-Line Flags
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "chefdesk")]
#[command(about = "Restaurant dashboard for a Manifest backend")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Config file (default: platform config dir/chefdesk.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config and environment
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Application id sent as X-App-Id
    #[arg(long, value_name = "ID")]
    pub app_id: Option<String>,

    /// Use a built-in in-memory backend instead of the network
    #[arg(long)]
    pub offline: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Write a default config file and exit
    InitConfig,
}

// =============================================================================
// Startup
// =============================================================================

/// Runs the application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, on stderr                     │
/// │     • Default: info,chefdesk=debug, override with RUST_LOG              │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • chefdesk.toml, then CHEFDESK_* env, then flags                    │
/// │                                                                         │
/// │  3. Pick Backend ─────────────────────────────────────────────────────► │
/// │     • --offline: MemoryBackend (seeded demo user)                       │
/// │     • otherwise: HttpBackend (restores a persisted token if enabled)    │
/// │                                                                         │
/// │  4. Initialize ───────────────────────────────────────────────────────► │
/// │     • probe, session restore, first screen                              │
/// │                                                                         │
/// │  5. Command Loop ─────────────────────────────────────────────────────► │
/// │     • one line, one command, re-render                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    info!("Starting ChefDesk");

    if let Some(CliCommand::InitConfig) = cli.command {
        return init_config(cli.config);
    }

    let mut config = ConfigState::load(cli.config).context("loading configuration")?;
    config
        .apply_flags(cli.backend_url, cli.app_id)
        .context("applying command-line flags")?;

    let backend: Arc<dyn Backend> = if cli.offline {
        info!("Offline mode: using the in-memory backend");
        Arc::new(MemoryBackend::new())
    } else {
        Arc::new(
            HttpBackend::from_config(&config.client)
                .await
                .context("building the HTTP client")?,
        )
    };

    let client = DataClient::new(backend).with_per_page(config.client.backend.per_page);
    let app = AppState::new(client, Arc::new(TerminalAlerts), config.probe_timeout());
    let ui = Ui::new(config.admin_url(), config.demo.clone());

    let mut shell = Shell::new(app, ui);
    shell.start().await;
    command_loop(&mut shell).await?;

    info!("ChefDesk stopped");
    Ok(())
}

/// Reads commands from stdin until `quit` or end of input.
async fn command_loop(shell: &mut Shell) -> anyhow::Result<()> {
    println!("{}", shell.render());
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match shell.handle_line(&line).await {
            Flow::Quit => break,
            Flow::Continue(note) => {
                if let Some(note) = note {
                    println!("{}", note);
                }
                println!("{}", shell.render());
            }
        }
    }

    Ok(())
}

/// Writes a default config file.
fn init_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path
        .or_else(chefdesk_client::ClientConfig::default_config_path)
        .context("no config directory on this platform")?;
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    ConfigState::default()
        .client
        .save(Some(path.clone()))
        .context("writing config")?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so the screens on stdout stay readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=chefdesk_client=trace` - Trace the backend client only
/// - Default: INFO, DEBUG for chefdesk crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chefdesk=debug,chefdesk_lib=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "chefdesk",
            "--offline",
            "--backend-url",
            "https://food.example.com",
        ]);
        assert!(cli.offline);
        assert_eq!(cli.backend_url.as_deref(), Some("https://food.example.com"));
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["chefdesk", "-c", "/tmp/c.toml", "init-config"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Some(CliCommand::InitConfig)));
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("chefdesk-init-{}", std::process::id()));
        let path = dir.join("chefdesk.toml");

        init_config(Some(path.clone())).unwrap();
        assert!(path.exists());
        assert!(init_config(Some(path)).is_err());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
