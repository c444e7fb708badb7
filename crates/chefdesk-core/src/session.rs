//! # Session State Machine
//!
//! Which screen is showing and who is signed in, held as one tagged enum so
//! that "dashboard without a user" cannot be represented.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Transitions                              │
//! │                                                                         │
//! │                     resolve(None)                                       │
//! │        ┌─────────┐ ───────────────► ┌─────────┐                         │
//! │        │ Loading │                  │ Landing │ ◄──────┐                │
//! │        └─────────┘ ───────┐         └─────────┘        │                │
//! │                           │              │             │ sign_out       │
//! │              resolve(Some(user))   sign_in(user)       │                │
//! │                           │              ▼             │                │
//! │                           └──────► ┌───────────────┐   │                │
//! │                                    │ Dashboard(u)  │ ──┘                │
//! │                                    └───────────────┘                    │
//! │                                                                         │
//! │  • Loading is initial and is left exactly once (resolve)               │
//! │  • sign_out is accepted from any state and always lands on Landing     │
//! │  • There is no error or maintenance state                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::types::User;

// =============================================================================
// Screen
// =============================================================================

/// The screen currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Startup checks still running.
    #[default]
    Loading,
    /// Signed out: marketing copy and the login trigger.
    Landing,
    /// Signed in: restaurants and menus.
    Dashboard,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading => write!(f, "loading"),
            Screen::Landing => write!(f, "landing"),
            Screen::Dashboard => write!(f, "dashboard"),
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Screen plus signed-in user.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Loading,
    Landing,
    Dashboard(User),
}

impl Session {
    /// Creates a session in the `Loading` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The screen this session shows.
    pub fn screen(&self) -> Screen {
        match self {
            Session::Loading => Screen::Loading,
            Session::Landing => Screen::Landing,
            Session::Dashboard(_) => Screen::Dashboard,
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Dashboard(user) => Some(user),
            _ => None,
        }
    }

    /// Leaves `Loading` once startup checks finish.
    ///
    /// `Some(user)` means an existing backend session was found.
    pub fn resolve(&mut self, user: Option<User>) -> CoreResult<()> {
        if *self != Session::Loading {
            return Err(self.invalid(Screen::Landing));
        }

        *self = match user {
            Some(user) => Session::Dashboard(user),
            None => Session::Landing,
        };
        Ok(())
    }

    /// Moves from `Landing` to `Dashboard` after a successful login.
    pub fn sign_in(&mut self, user: User) -> CoreResult<()> {
        if *self != Session::Landing {
            return Err(self.invalid(Screen::Dashboard));
        }

        *self = Session::Dashboard(user);
        Ok(())
    }

    /// Returns to `Landing` from any state.
    pub fn sign_out(&mut self) {
        *self = Session::Landing;
    }

    fn invalid(&self, to: Screen) -> CoreError {
        CoreError::InvalidTransition {
            from: self.screen().to_string(),
            to: to.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
