//! Axum router and all HTTP handlers for confdrift-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. All handlers are `pub(crate)` so the scenario tests in
//! `tests/` can compose the router directly.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, warn};

use confdrift_db::{rule_entries, rule_types_by_id, xml_entries};
use confdrift_reconcile::{reconcile_checked, sort_entries, Entry, PreconditionViolation};

use crate::{
    api_types::{
        CompareFailedResponse, CompareResponse, DatasetReport, DiffEntry, HealthResponse,
        SubjectsResponse,
    },
    state::{uptime_secs, AppState},
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/subjects", get(subjects))
        .route("/v1/compare/:subject", get(compare))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
            config_hash: st.config_hash.clone(),
            uptime_secs: uptime_secs(),
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/subjects
// ---------------------------------------------------------------------------

/// Subjects come from staging: that environment defines which clients exist
/// and is where new configuration lands first.
pub(crate) async fn subjects(State(st): State<Arc<AppState>>) -> Response {
    match st.staging.list_subjects().await {
        Ok(subjects) => (StatusCode::OK, Json(SubjectsResponse { subjects })).into_response(),
        Err(err) => source_failed(st.staging.environment_name(), &err),
    }
}

// ---------------------------------------------------------------------------
// GET /v1/compare/{subject}
// ---------------------------------------------------------------------------

/// Full reconciliation report for one subject: both dataset kinds, both
/// environments. The four fetches run concurrently; each reconciliation is
/// a pure in-process pass over the fetched rows.
pub(crate) async fn compare(
    State(st): State<Arc<AppState>>,
    Path(subject): Path<String>,
) -> Response {
    let (staging_xml, production_xml, staging_rules, production_rules) = tokio::join!(
        st.staging.fetch_xml_configs(&subject),
        st.production.fetch_xml_configs(&subject),
        st.staging.fetch_rules(&subject),
        st.production.fetch_rules(&subject),
    );

    // A failed fetch must never look like a clean (empty) report.
    let staging_xml = match staging_xml {
        Ok(rows) => rows,
        Err(err) => return source_failed(st.staging.environment_name(), &err),
    };
    let production_xml = match production_xml {
        Ok(rows) => rows,
        Err(err) => return source_failed(st.production.environment_name(), &err),
    };
    let staging_rules = match staging_rules {
        Ok(rows) => rows,
        Err(err) => return source_failed(st.staging.environment_name(), &err),
    };
    let production_rules = match production_rules {
        Ok(rows) => rows,
        Err(err) => return source_failed(st.production.environment_name(), &err),
    };

    let xml_report = match dataset_report(
        xml_entries(&staging_xml),
        xml_entries(&production_xml),
        None,
    ) {
        Ok(report) => report,
        Err(violation) => return malformed_source(&violation),
    };

    let rule_types = rule_types_by_id(&staging_rules, &production_rules);
    let rules_report = match dataset_report(
        rule_entries(&staging_rules),
        rule_entries(&production_rules),
        Some(&rule_types),
    ) {
        Ok(report) => report,
        Err(violation) => return malformed_source(&violation),
    };

    info!(
        subject = %subject,
        xml_diffs = xml_report.diffs.len(),
        rule_diffs = rules_report.diffs.len(),
        "compare"
    );

    (
        StatusCode::OK,
        Json(CompareResponse {
            subject,
            xml_configs: xml_report,
            rules: rules_report,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

/// Sort both sides, run the checked engine, and dress the records for the
/// report. `rule_types` reattaches per-key presentation metadata for the
/// rules dataset.
fn dataset_report(
    mut staging: Vec<Entry>,
    mut production: Vec<Entry>,
    rule_types: Option<&BTreeMap<String, String>>,
) -> Result<DatasetReport, PreconditionViolation> {
    sort_entries(&mut staging);
    sort_entries(&mut production);

    let records = reconcile_checked(&staging, &production)?;

    let diffs = records
        .into_iter()
        .map(|r| DiffEntry {
            rule_type: rule_types.and_then(|m| m.get(&r.key).cloned()),
            key: r.key,
            status: r.status,
            staging: r.staging,
            production: r.production,
        })
        .collect();

    Ok(DatasetReport {
        staging_count: staging.len(),
        production_count: production.len(),
        diffs,
    })
}

// ---------------------------------------------------------------------------
// Failure responses
// ---------------------------------------------------------------------------

fn source_failed(environment: &str, err: &anyhow::Error) -> Response {
    warn!(environment, error = %err, "entry source failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(CompareFailedResponse {
            error: format!("{err:#}"),
            environment: environment.to_string(),
        }),
    )
        .into_response()
}

fn malformed_source(violation: &PreconditionViolation) -> Response {
    let environment = match violation {
        PreconditionViolation::DuplicateKey { side, .. }
        | PreconditionViolation::UnsortedInput { side, .. } => side.as_str(),
    };
    warn!(environment, error = %violation, "entry source returned malformed sequence");
    (
        StatusCode::BAD_GATEWAY,
        Json(CompareFailedResponse {
            error: violation.to_string(),
            environment: environment.to_string(),
        }),
    )
        .into_response()
}
