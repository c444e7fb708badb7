//! # Commands Module
//!
//! Typed terminal commands and their dispatch to the orchestrator.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (Command, parsing, Shell)
//! ├── session.rs  ◄─── demo, login, logout
//! └── menu.rs     ◄─── restaurant, select, item.*, add-item, refresh
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stdin line: "item.price 12.50"                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::from_str ──► Command::Item { field: Price, value: "12.50" }  │
//! │         │              (parse error → usage text, nothing else runs)    │
//! │         ▼                                                               │
//! │  Shell::dispatch ──► allowed on this screen? ──► handler               │
//! │         │                                          │                    │
//! │         │                                          ▼                    │
//! │         │                                 AppState operation           │
//! │         ▼                                                               │
//! │  Ui::sync (mount/unmount dashboard) ──► Ui::render                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod menu;
pub mod session;

use chefdesk_core::Screen;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

use crate::screens::dashboard::{DraftField, UnknownField};
use crate::screens::Ui;
use crate::state::AppState;

/// Help text listing every command.
pub const USAGE: &str = "\
Commands:
  demo                         Login as Demo Chef
  login <email> <password>     Login with an account
  logout                       End the session
  restaurant [name]            Create a restaurant (no name: retry the last one)
  select <n>                   Show the menu of restaurant #n
  item.<field> <value>         Fill the menu item form (name, description, price, category)
  add-item                     Add the menu item to the selected restaurant
  refresh                      Reload the restaurant list
  help                         Show this help
  quit                         Leave ChefDesk";

// =============================================================================
// Command
// =============================================================================

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Demo,
    Login { email: String, password: String },
    Logout,
    Restaurant(Option<String>),
    Select(usize),
    Item { field: DraftField, value: String },
    AddItem,
    Refresh,
    Help,
    Quit,
}

/// Why a line is not a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{value}' is not a restaurant number")]
    BadIndex { value: String },

    #[error(transparent)]
    Field(#[from] UnknownField),
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        if let Some(field) = head.strip_prefix("item.") {
            let field = field.parse::<DraftField>()?;
            return Ok(Command::Item {
                field,
                value: rest.to_string(),
            });
        }

        match head {
            "" => Err(ParseError::Empty),
            "demo" => Ok(Command::Demo),
            "login" => {
                let mut args = rest.split_whitespace();
                match (args.next(), args.next(), args.next()) {
                    (Some(email), Some(password), None) => Ok(Command::Login {
                        email: email.to_string(),
                        password: password.to_string(),
                    }),
                    _ => Err(ParseError::Usage("login <email> <password>")),
                }
            }
            "logout" => Ok(Command::Logout),
            "restaurant" => Ok(Command::Restaurant(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "select" => {
                if rest.is_empty() {
                    return Err(ParseError::Usage("select <n>"));
                }
                rest.parse::<usize>()
                    .map(Command::Select)
                    .map_err(|_| ParseError::BadIndex {
                        value: rest.to_string(),
                    })
            }
            "add-item" => Ok(Command::AddItem),
            "refresh" => Ok(Command::Refresh),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

impl Command {
    /// Screens the command is accepted on.
    fn allowed_on(&self, screen: Screen) -> bool {
        match self {
            Command::Help | Command::Quit => true,
            Command::Demo | Command::Login { .. } => screen == Screen::Landing,
            _ => screen == Screen::Dashboard,
        }
    }
}

// =============================================================================
// Shell
// =============================================================================

/// What the terminal loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading; print the note, if any, above the screen.
    Continue(Option<String>),
    Quit,
}

/// Owns the orchestrator and the views, and runs commands against them.
pub struct Shell {
    app: AppState,
    ui: Ui,
}

impl Shell {
    pub fn new(app: AppState, ui: Ui) -> Self {
        Shell { app, ui }
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    /// Runs startup checks and mounts the first screen.
    pub async fn start(&mut self) {
        self.app.initialize().await;
        self.ui.sync(&mut self.app).await;
    }

    pub fn render(&self) -> String {
        self.ui.render(&self.app)
    }

    /// Parses and runs one input line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match line.parse::<Command>() {
            Ok(command) => self.dispatch(command).await,
            Err(ParseError::Empty) => Flow::Continue(None),
            Err(e) => Flow::Continue(Some(format!("{}. Type 'help' for commands.", e))),
        }
    }

    /// Runs one command.
    pub async fn dispatch(&mut self, command: Command) -> Flow {
        let screen = self.app.screen();
        if !command.allowed_on(screen) {
            debug!(%screen, "Command not available on this screen");
            let note = match screen {
                Screen::Landing => "Log in first (try 'demo').".to_string(),
                Screen::Dashboard => "Already logged in. Use 'logout' first.".to_string(),
                Screen::Loading => "Still starting up.".to_string(),
            };
            return Flow::Continue(Some(note));
        }

        let note = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => Some(USAGE.to_string()),
            Command::Demo => {
                session::demo(&mut self.app, self.ui.demo()).await;
                None
            }
            Command::Login { email, password } => {
                session::login(&mut self.app, &email, &password).await;
                None
            }
            Command::Logout => {
                session::logout(&mut self.app).await;
                None
            }
            other => match self.ui.dashboard_mut() {
                Some(view) => menu::run(view, &mut self.app, other).await,
                None => Some("The dashboard is not ready yet.".to_string()),
            },
        };

        self.ui.sync(&mut self.app).await;
        Flow::Continue(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::RecordingAlerts;
    use crate::state::DemoSettings;
    use chefdesk_client::{DataClient, MemoryBackend};
    use std::sync::Arc;
    use std::time::Duration;

    async fn shell() -> (Arc<RecordingAlerts>, Shell) {
        let alerts = Arc::new(RecordingAlerts::new());
        let app = AppState::new(
            DataClient::new(Arc::new(MemoryBackend::new())),
            alerts.clone(),
            Duration::from_secs(1),
        );
        let ui = Ui::new("http://localhost:1111/admin", DemoSettings::default());
        let mut shell = Shell::new(app, ui);
        shell.start().await;
        (alerts, shell)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("demo".parse::<Command>(), Ok(Command::Demo));
        assert_eq!(
            "login chef@example.com s3cret".parse::<Command>(),
            Ok(Command::Login {
                email: "chef@example.com".to_string(),
                password: "s3cret".to_string()
            })
        );
        assert_eq!(
            "restaurant  Chez Ferris ".parse::<Command>(),
            Ok(Command::Restaurant(Some("Chez Ferris".to_string())))
        );
        assert_eq!("restaurant".parse::<Command>(), Ok(Command::Restaurant(None)));
        assert_eq!("select 2".parse::<Command>(), Ok(Command::Select(2)));
        assert_eq!(
            "item.description Slow cooked".parse::<Command>(),
            Ok(Command::Item {
                field: DraftField::Description,
                value: "Slow cooked".to_string()
            })
        );
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("   ".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!(
            "login only-email".parse::<Command>(),
            Err(ParseError::Usage("login <email> <password>"))
        );
        assert!(matches!(
            "select two".parse::<Command>(),
            Err(ParseError::BadIndex { .. })
        ));
        assert!(matches!(
            "item.colour red".parse::<Command>(),
            Err(ParseError::Field(_))
        ));
        assert!(matches!(
            "cook".parse::<Command>(),
            Err(ParseError::Unknown(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_input_never_changes_state() {
        let (_alerts, mut shell) = shell().await;

        let flow = shell.handle_line("bake a cake").await;

        assert!(matches!(flow, Flow::Continue(Some(note)) if note.contains("unknown command")));
        assert_eq!(shell.app().screen(), Screen::Landing);
    }

    #[tokio::test]
    async fn test_dashboard_commands_need_login() {
        let (_alerts, mut shell) = shell().await;

        let flow = shell.handle_line("restaurant Bistro").await;

        assert_eq!(flow, Flow::Continue(Some("Log in first (try 'demo').".to_string())));
        assert!(shell.app().restaurants().is_empty());
    }

    #[tokio::test]
    async fn test_full_session() {
        let (alerts, mut shell) = shell().await;

        shell.handle_line("demo").await;
        assert_eq!(shell.app().screen(), Screen::Dashboard);

        shell.handle_line("restaurant Chez Ferris").await;
        shell.handle_line("item.name Onion Soup").await;
        shell.handle_line("item.price 8.25").await;
        shell.handle_line("item.category Starter").await;
        shell.handle_line("add-item").await;

        let screen = shell.render();
        assert!(screen.contains("Menu for Chez Ferris"));
        assert!(screen.contains("Onion Soup"));
        assert!(screen.contains("$8.25"));

        shell.handle_line("logout").await;
        assert_eq!(shell.app().screen(), Screen::Landing);
        assert!(shell.app().restaurants().is_empty());

        assert_eq!(shell.handle_line("quit").await, Flow::Quit);
        assert!(alerts.messages().is_empty());
    }

    #[tokio::test]
    async fn test_failed_login_shows_one_alert() {
        let (alerts, mut shell) = shell().await;

        shell.handle_line("login admin@manifest.build nope").await;

        assert_eq!(shell.app().screen(), Screen::Landing);
        assert_eq!(alerts.count(), 1);
    }
}
