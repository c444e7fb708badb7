//! # Dashboard Commands
//!
//! Restaurant and menu item commands. They only run while the dashboard is
//! mounted, against its view.

use tracing::debug;

use super::Command;
use crate::screens::dashboard::DashboardView;
use crate::state::AppState;

/// Runs a dashboard command and returns a note for the terminal, if any.
pub async fn run(view: &mut DashboardView, app: &mut AppState, command: Command) -> Option<String> {
    match command {
        Command::Restaurant(name) => {
            if let Some(name) = name {
                view.set_restaurant_name(name);
            }
            if view.restaurant_name().trim().is_empty() {
                return Some("usage: restaurant <name>".to_string());
            }
            view.submit_restaurant(app).await;
            None
        }
        Command::Select(position) => match view.select_index(app, position).await {
            Ok(()) => None,
            Err(e) => Some(e.message),
        },
        Command::Item { field, value } => {
            debug!(?field, "menu item draft updated");
            view.set_draft_field(field, value);
            None
        }
        Command::AddItem => {
            if view.draft().name.trim().is_empty() {
                return Some("Set a name first: item.name <name>".to_string());
            }
            if view.selected().is_none() {
                return Some("Select a restaurant first: select <n>".to_string());
            }
            view.submit_menu_item(app).await;
            None
        }
        Command::Refresh => {
            view.refresh(app).await;
            None
        }
        _ => {
            debug!("not a dashboard command");
            None
        }
    }
}
