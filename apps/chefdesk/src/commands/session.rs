//! # Session Commands
//!
//! `demo`, `login`, and `logout`. Failures are already alerted by the
//! orchestrator, so these only log the outcome.

use tracing::info;

use crate::screens::landing;
use crate::state::{AppState, DemoSettings};

/// Logs in with the demo credentials.
pub async fn demo(app: &mut AppState, demo: &DemoSettings) {
    info!(email = %demo.email, "demo command");
    landing::login_as_demo(app, demo).await;
}

/// Logs in with typed credentials.
pub async fn login(app: &mut AppState, email: &str, password: &str) {
    info!(email = %email, "login command");
    app.login(email, password).await;
}

pub async fn logout(app: &mut AppState) {
    info!("logout command");
    app.logout().await;
}
