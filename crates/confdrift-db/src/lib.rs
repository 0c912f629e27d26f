//! confdrift-db
//!
//! Entry sources: everything that turns an environment's database into the
//! ordered `(key, payload)` sequences the reconciliation engine consumes.
//!
//! This crate owns the [`EntrySource`] boundary trait, the Postgres
//! implementation, an in-memory implementation for tests and local runs, and
//! the row-to-entry mapping at the engine boundary. It does **not** diff
//! anything; callers hand the mapped entries to `confdrift-reconcile`.

pub mod source;

use std::collections::BTreeMap;

use confdrift_reconcile::Entry;
use serde::{Deserialize, Serialize};

pub use source::{EntrySource, MemoryEntrySource, PgEntrySource};

/// The two logical dataset kinds compared per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    XmlConfig,
    Rule,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::XmlConfig => "xml_config",
            DatasetKind::Rule => "rule",
        }
    }
}

/// One XML configuration row as stored per environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlConfigRow {
    pub uid: String,
    pub xml_config: String,
}

/// One rule row. `rule_type` is presentation metadata and never takes part
/// in the diff; only `rule_text` is compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow {
    pub rule_id: String,
    pub rule_type: String,
    pub rule_text: String,
}

/// Map XML rows into engine entries (uid keys, xml payloads).
pub fn xml_entries(rows: &[XmlConfigRow]) -> Vec<Entry> {
    rows.iter()
        .map(|r| Entry::new(r.uid.clone(), r.xml_config.clone()))
        .collect()
}

/// Map rule rows into engine entries (rule_id keys, rule_text payloads).
pub fn rule_entries(rows: &[RuleRow]) -> Vec<Entry> {
    rows.iter()
        .map(|r| Entry::new(r.rule_id.clone(), r.rule_text.clone()))
        .collect()
}

/// Collect `rule_id -> rule_type` across both environments so the report can
/// label every diffed rule with its own type. Staging wins on conflict; a
/// production-only rule still gets its production type rather than a
/// neighboring cursor's.
pub fn rule_types_by_id(staging: &[RuleRow], production: &[RuleRow]) -> BTreeMap<String, String> {
    let mut types: BTreeMap<String, String> = BTreeMap::new();
    for r in production {
        types.insert(r.rule_id.clone(), r.rule_type.clone());
    }
    for r in staging {
        types.insert(r.rule_id.clone(), r.rule_type.clone());
    }
    types
}
