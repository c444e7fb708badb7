//! # Screens
//!
//! Text rendering of the three screens, plus the dashboard's form state.
//!
//! ```text
//! screens/
//! ├── mod.rs        ◄─── Ui: which view is mounted, header, dispatch
//! ├── landing.rs    ◄─── Signed-out screen, demo login
//! └── dashboard.rs  ◄─── Restaurants, selection, forms, menu listing
//! ```
//!
//! Every screen starts with the connection indicator.

pub mod dashboard;
pub mod landing;

use chefdesk_core::Screen;

use crate::state::{AppState, DemoSettings};
use dashboard::DashboardView;

pub const CONNECTED: &str = "● API Connected";
pub const DISCONNECTED: &str = "○ API Disconnected";
pub const LOADING: &str = "Loading...";

/// Indicator text for the probe result.
pub fn indicator(connected: bool) -> &'static str {
    if connected {
        CONNECTED
    } else {
        DISCONNECTED
    }
}

/// Presentation state: the mounted dashboard and what the landing needs.
pub struct Ui {
    admin_url: String,
    demo: DemoSettings,
    dashboard: Option<DashboardView>,
}

impl Ui {
    pub fn new(admin_url: impl Into<String>, demo: DemoSettings) -> Self {
        Ui {
            admin_url: admin_url.into(),
            demo,
            dashboard: None,
        }
    }

    pub fn demo(&self) -> &DemoSettings {
        &self.demo
    }

    /// The dashboard view, while the dashboard is showing.
    pub fn dashboard_mut(&mut self) -> Option<&mut DashboardView> {
        self.dashboard.as_mut()
    }

    /// Mounts the dashboard when it appears and drops it when it goes.
    ///
    /// Dropping the view forgets its selection and form input, so the next
    /// sign-in starts fresh.
    pub async fn sync(&mut self, app: &mut AppState) {
        match (app.screen(), self.dashboard.is_some()) {
            (Screen::Dashboard, false) => {
                self.dashboard = Some(DashboardView::mount(app).await);
            }
            (Screen::Dashboard, true) => {}
            _ => self.dashboard = None,
        }
    }

    /// Renders the current screen.
    pub fn render(&self, app: &AppState) -> String {
        let body = match (app.screen(), &self.dashboard) {
            (Screen::Loading, _) => format!("{}\n", LOADING),
            (Screen::Landing, _) => landing::render(&self.admin_url),
            (Screen::Dashboard, Some(view)) => view.render(app, &self.admin_url),
            (Screen::Dashboard, None) => format!("{}\n", LOADING),
        };
        format!("{}\n{}", indicator(app.is_connected()), body)
    }
}
