//! # Landing Screen
//!
//! What a signed-out visitor sees, and the demo login.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ChefDesk                                   Admin Panel: {url}/admin   │
//! │                                                                         │
//! │              Manage Your Restaurant, Your Way                           │
//! │     A complete platform for chefs and restaurant owners, ...           │
//! │                                                                         │
//! │                   [ demo ] Login as Demo Chef                           │
//! │                                                                         │
//! │  Powered by Manifest  │  Secure by Design  │  Accessible Everywhere     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Write;

use crate::state::{AppState, DemoSettings};

pub const HEADLINE: &str = "Manage Your Restaurant, Your Way";

pub const TAGLINE: &str = "A complete platform for chefs and restaurant owners, \
built on the secure and scalable Manifest backend.";

/// Feature blurbs under the login trigger.
pub const FEATURES: [(&str, &str); 3] = [
    (
        "Powered by Manifest",
        "Leverages a powerful, auto-generated backend for reliability and speed.",
    ),
    (
        "Secure by Design",
        "Built-in authentication and fine-grained access policies protect your data.",
    ),
    (
        "Accessible Everywhere",
        "Manage your restaurant from anywhere, right from the terminal.",
    ),
];

/// Logs in with the configured demo account.
pub async fn login_as_demo(app: &mut AppState, demo: &DemoSettings) -> bool {
    app.login(&demo.email, &demo.password).await
}

/// Renders the landing screen.
pub fn render(admin_url: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "ChefDesk    Admin Panel: {}", admin_url);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", HEADLINE);
    let _ = writeln!(out, "  {}", TAGLINE);
    let _ = writeln!(out);
    let _ = writeln!(out, "  > demo                        Login as Demo Chef");
    let _ = writeln!(out, "  > login <email> <password>    Login with your account");
    let _ = writeln!(out);
    for (title, blurb) in FEATURES {
        let _ = writeln!(out, "  * {}: {}", title, blurb);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shows_admin_link_and_trigger() {
        let text = render("http://localhost:1111/admin");

        assert!(text.contains("Admin Panel: http://localhost:1111/admin"));
        assert!(text.contains(HEADLINE));
        assert!(text.contains("Login as Demo Chef"));
        assert!(text.contains("Secure by Design"));
    }
}
