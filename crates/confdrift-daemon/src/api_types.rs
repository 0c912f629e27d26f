//! Request and response types for all confdrift-daemon HTTP endpoints.
//!
//! These types are `Serialize + Deserialize` so they can be JSON-encoded by
//! Axum and decoded by tests. No business logic lives here; report assembly
//! from engine output happens in `routes.rs`.

use confdrift_reconcile::DiffStatus;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
    pub config_hash: String,
    pub uptime_secs: u64,
}

// ---------------------------------------------------------------------------
// /v1/subjects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectsResponse {
    /// Client names known to staging, sorted.
    pub subjects: Vec<String>,
}

// ---------------------------------------------------------------------------
// /v1/compare/{subject}
// ---------------------------------------------------------------------------

/// One reported difference, ready for rendering. `status` picks the visual
/// treatment (added / removed / changed); `rule_type` is present only for
/// the rules dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffEntry {
    pub key: String,
    pub status: DiffStatus,
    pub staging: Option<String>,
    pub production: Option<String>,
    pub rule_type: Option<String>,
}

/// Diff report for one dataset kind. The per-side row counts let a caller
/// tell "no differences" (counts > 0, diffs empty) from "no data" (counts 0)
/// — the engine cannot make that distinction from an empty result alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetReport {
    pub staging_count: usize,
    pub production_count: usize,
    pub diffs: Vec<DiffEntry>,
}

/// Full per-subject report, grouped by dataset kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub subject: String,
    pub xml_configs: DatasetReport,
    pub rules: DatasetReport,
}

// ---------------------------------------------------------------------------
// Upstream failure (502)
// ---------------------------------------------------------------------------

/// Response body when a comparison cannot run because an entry source failed
/// or returned malformed data. Distinct from an empty report on purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareFailedResponse {
    pub error: String,
    /// Which environment failed: "staging" | "production".
    pub environment: String,
}
