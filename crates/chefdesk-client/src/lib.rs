//! # chefdesk-client: Backend Access for ChefDesk
//!
//! This crate is the generic data-access client: everything ChefDesk knows
//! about reaching its backend-as-a-service lives here.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 DataClient (typed, apps/chefdesk)                │  │
//! │  │   me() • restaurants_owned_by() • menu_items_for() • create_*()  │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ Arc<dyn Backend>                        │
//! │         ┌─────────────────────┴─────────────────────┐                  │
//! │         ▼                                           ▼                   │
//! │  ┌────────────────┐                        ┌────────────────────────┐  │
//! │  │  HttpBackend   │                        │  MemoryBackend         │  │
//! │  │                │                        │                        │  │
//! │  │ reqwest + JSON │                        │ In-process records     │  │
//! │  │ X-App-Id,      │                        │ Seeded demo user       │  │
//! │  │ Bearer token   │                        │ Failure switches       │  │
//! │  └───────┬────────┘                        └────────────────────────┘  │
//! │          │                                                              │
//! │  ┌───────▼────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  TokenStore    │  │  ClientConfig  │  │  probe()               │    │
//! │  │ memory (+file) │  │ TOML + env     │  │ health → bool          │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`backend`] - `Backend` trait, `Collection`, typed `DataClient`
//! - [`config`] - Client configuration (backend URL, app id, session)
//! - [`error`] - Client error types
//! - [`http`] - REST implementation over reqwest
//! - [`memory`] - In-process implementation
//! - [`probe`] - Startup connectivity check
//! - [`query`] - Find options and the paginated envelope
//! - [`session`] - Bearer token store
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chefdesk_client::{ClientConfig, DataClient, HttpBackend};
//!
//! let config = ClientConfig::load(None)?;
//! let backend = Arc::new(HttpBackend::from_config(&config).await?);
//! let client = DataClient::new(backend).with_per_page(config.backend.per_page);
//!
//! client.login("admin@manifest.build", "admin").await?;
//! let me = client.me().await?;
//! let restaurants = client.restaurants_owned_by(&me.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod probe;
pub mod query;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{Backend, Collection, DataClient};
pub use config::{BackendSettings, ClientConfig, SessionSettings};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use probe::probe;
pub use query::{FindOptions, Paginated, SortOrder};
pub use session::TokenStore;
