//! # ChefDesk Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ChefDesk                                      │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     Terminal (stdin / stdout)                    │  │
//! │  │   ● API Connected                                                │  │
//! │  │   Chef's Dashboard    Admin <admin@manifest.build>               │  │
//! │  │   > restaurant Chez Ferris                                       │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    chefdesk_lib (this crate)                     │  │
//! │  │  main.rs ────► tokio runtime, calls run()                       │  │
//! │  │  lib.rs ─────► flags, logging, config, backend, loop            │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │          Manifest backend (HTTP)  or  in-memory (--offline)      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The actual setup is in lib.rs for testability
    chefdesk_lib::run().await
}
