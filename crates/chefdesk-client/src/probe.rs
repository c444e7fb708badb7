//! # Connectivity Probe
//!
//! One reachability check at startup, reduced to a yes/no answer for the
//! "API Connected / API Disconnected" indicator.

use std::time::Duration;
use tracing::{info, warn};

use crate::backend::Backend;

/// Returns whether the backend answered its health check in time.
///
/// Never fails: network errors, error statuses, and timeouts all read as
/// `false`.
pub async fn probe(backend: &dyn Backend, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, backend.health()).await {
        Ok(Ok(())) => {
            info!(backend = backend.backend_tag(), "Backend reachable");
            true
        }
        Ok(Err(e)) => {
            warn!(backend = backend.backend_tag(), error = %e, "Backend health check failed");
            false
        }
        Err(_) => {
            warn!(
                backend = backend.backend_tag(),
                timeout_secs = timeout.as_secs(),
                "Backend health check timed out"
            );
            false
        }
    }
}
