//! # chefdesk-core: Pure Domain Logic for ChefDesk
//!
//! This crate holds the domain model of ChefDesk as plain types and pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ChefDesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Terminal front end (apps/chefdesk)              │   │
//! │  │    Landing ──► Dashboard ──► Restaurant form ──► Menu form      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ chefdesk-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │   cache   │  │   │
//! │  │   │   User    │  │   Money   │  │  Session  │  │ KeyedCache│  │   │
//! │  │   │Restaurant │  │  parsing  │  │  Screen   │  │  prepend  │  │   │
//! │  │   │ MenuItem  │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HTTP • NO FILES • PURE FUNCTIONS                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              chefdesk-client (Backend data access)              │   │
//! │  │          HTTP to the managed backend, or in-memory              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (User, Restaurant, MenuItem) and their ids
//! - [`money`] - Integer-cents money with input parsing
//! - [`session`] - Explicit screen/session state machine
//! - [`cache`] - Keyed cache with optimistic prepend
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use chefdesk_core::money::Money;
//!
//! let price: Money = "12.5".parse().unwrap();
//! assert_eq!(price.cents(), 1250);
//! assert_eq!(price.to_string(), "$12.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cache::KeyedCache;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{Screen, Session};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Email of the demo account offered on the landing screen.
///
/// Sign-up on the backend is public but user creation is admin-only, so the
/// demo login uses the backend's seeded admin.
pub const DEMO_EMAIL: &str = "admin@manifest.build";

/// Password of the demo account.
pub const DEMO_PASSWORD: &str = "admin";

/// Maximum length of a restaurant or menu item name.
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a menu item description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;
