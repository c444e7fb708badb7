//! # State Module
//!
//! Application state for the terminal front end.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │           AppState              │  │        ConfigState          │  │
//! │  │                                 │  │                             │  │
//! │  │  Session (screen + user)        │  │  ClientConfig               │  │
//! │  │  connected flag                 │  │  ([backend], [session])     │  │
//! │  │  restaurants: Vec               │  │  DemoSettings ([demo])      │  │
//! │  │  menu items: KeyedCache         │  │                             │  │
//! │  │  DataClient + Alerts            │  │                             │  │
//! │  └─────────────────────────────────┘  └─────────────────────────────┘  │
//! │                                                                         │
//! │  OWNERSHIP:                                                            │
//! │  • AppState: owned by the terminal loop, mutated through &mut self     │
//! │  • ConfigState: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod config;

pub use app::{AppState, LOGIN_FAILED};
pub use config::{ConfigState, DemoSettings};
