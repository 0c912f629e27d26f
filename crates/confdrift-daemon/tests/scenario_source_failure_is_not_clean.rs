//! Scenario: a failed or malformed entry source must surface as 502, never
//! as an empty (clean-looking) report. An empty diff is only trustworthy
//! when both fetches actually succeeded.

use std::sync::Arc;

use anyhow::{bail, Result};
use axum::http::{Request, StatusCode};
use confdrift_daemon::{routes, state};
use confdrift_db::{EntrySource, MemoryEntrySource, RuleRow, XmlConfigRow};
use http_body_util::BodyExt;
use tower::ServiceExt; // oneshot

/// Source whose fetches always fail (connection refused, bad credentials…).
struct FailingSource;

#[async_trait::async_trait]
impl EntrySource for FailingSource {
    fn environment_name(&self) -> &'static str {
        "production"
    }

    async fn list_subjects(&self) -> Result<Vec<String>> {
        bail!("connection refused")
    }

    async fn fetch_xml_configs(&self, _subject: &str) -> Result<Vec<XmlConfigRow>> {
        bail!("connection refused")
    }

    async fn fetch_rules(&self, _subject: &str) -> Result<Vec<RuleRow>> {
        bail!("connection refused")
    }
}

/// Source that returns a duplicate key, breaking the engine's precondition.
struct DuplicateKeySource;

#[async_trait::async_trait]
impl EntrySource for DuplicateKeySource {
    fn environment_name(&self) -> &'static str {
        "staging"
    }

    async fn list_subjects(&self) -> Result<Vec<String>> {
        Ok(vec!["acme".to_string()])
    }

    async fn fetch_xml_configs(&self, _subject: &str) -> Result<Vec<XmlConfigRow>> {
        Ok(vec![
            XmlConfigRow {
                uid: "screen-1".to_string(),
                xml_config: "<a/>".to_string(),
            },
            XmlConfigRow {
                uid: "screen-1".to_string(),
                xml_config: "<b/>".to_string(),
            },
        ])
    }

    async fn fetch_rules(&self, _subject: &str) -> Result<Vec<RuleRow>> {
        Ok(Vec::new())
    }
}

async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let body = resp
        .into_body()
        .collect()
        .await
        .expect("body collect failed")
        .to_bytes();
    (
        status,
        serde_json::from_slice(&body).expect("body is not valid JSON"),
    )
}

#[tokio::test]
async fn failed_production_fetch_returns_502_naming_the_environment() {
    let staging = MemoryEntrySource::new("staging").with_xml_config("acme", "u1", "<a/>");
    let st = Arc::new(state::AppState::new(
        "hash".to_string(),
        Arc::new(staging),
        Arc::new(FailingSource),
    ));

    let (status, json) = get(routes::build_router(st), "/v1/compare/acme").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["environment"], "production");
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn duplicate_key_from_a_source_returns_502_naming_side_and_key() {
    let st = Arc::new(state::AppState::new(
        "hash".to_string(),
        Arc::new(DuplicateKeySource),
        Arc::new(MemoryEntrySource::new("production")),
    ));

    let (status, json) = get(routes::build_router(st), "/v1/compare/acme").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["environment"], "staging");
    let msg = json["error"].as_str().unwrap();
    assert!(msg.contains("duplicate key"));
    assert!(msg.contains("'screen-1'"));
}
