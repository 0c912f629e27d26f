//! Shared state for confdrift-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The state is read-only
//! after startup: per-request data (entry sequences, diff records) is owned
//! by the handler invocation, never shared.

use std::sync::Arc;

use confdrift_db::EntrySource;
use serde::{Deserialize, Serialize};

/// Static build metadata included in the health response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Shared across all Axum handlers via `Arc`.
pub struct AppState {
    pub build: BuildInfo,
    /// Hash of the loaded config, so an operator can confirm what a running
    /// daemon was started with.
    pub config_hash: String,
    pub staging: Arc<dyn EntrySource>,
    pub production: Arc<dyn EntrySource>,
}

impl AppState {
    pub fn new(
        config_hash: String,
        staging: Arc<dyn EntrySource>,
        production: Arc<dyn EntrySource>,
    ) -> Self {
        Self {
            build: BuildInfo {
                service: "confdrift-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            config_hash,
            staging,
            production,
        }
    }
}

/// Monotonically increasing uptime since first call (process lifetime).
pub fn uptime_secs() -> u64 {
    static START: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    START
        .get_or_init(std::time::Instant::now)
        .elapsed()
        .as_secs()
}
