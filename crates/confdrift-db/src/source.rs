//! The [`EntrySource`] boundary: one implementation per place a dataset can
//! come from. The daemon holds one source per environment and never knows
//! whether rows came from Postgres or memory.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{RuleRow, XmlConfigRow};

/// Ordered datasets for one environment.
///
/// Implementations return rows sorted ascending by key with no duplicates;
/// callers still run the engine's checked path, so a source that breaks the
/// discipline is reported, not silently mis-diffed.
#[async_trait::async_trait]
pub trait EntrySource: Send + Sync {
    fn environment_name(&self) -> &'static str;

    /// Subject (client) names known to this environment, sorted, unique.
    async fn list_subjects(&self) -> Result<Vec<String>>;

    async fn fetch_xml_configs(&self, subject: &str) -> Result<Vec<XmlConfigRow>>;

    async fn fetch_rules(&self, subject: &str) -> Result<Vec<RuleRow>>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// Postgres-backed source. One pool per environment server; subjects are a
/// column on the two dataset tables.
#[derive(Clone)]
pub struct PgEntrySource {
    name: &'static str,
    pool: PgPool,
}

impl PgEntrySource {
    /// Connect with a bounded pool. `name` labels the environment in errors
    /// and logs ("staging" / "production").
    pub async fn connect(name: &'static str, url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .with_context(|| format!("failed to connect to {name} database"))?;
        Ok(Self { name, pool })
    }

    pub fn from_pool(name: &'static str, pool: PgPool) -> Self {
        Self { name, pool }
    }
}

#[async_trait::async_trait]
impl EntrySource for PgEntrySource {
    fn environment_name(&self) -> &'static str {
        self.name
    }

    async fn list_subjects(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "select distinct subject from xml_configurations order by subject",
        )
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("list_subjects failed on {}", self.name))?;

        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    async fn fetch_xml_configs(&self, subject: &str) -> Result<Vec<XmlConfigRow>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "select uid, xml_config from xml_configurations \
             where subject = $1 order by uid",
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("fetch_xml_configs failed on {} for '{subject}'", self.name))?;

        Ok(rows
            .into_iter()
            .map(|(uid, xml_config)| XmlConfigRow { uid, xml_config })
            .collect())
    }

    async fn fetch_rules(&self, subject: &str) -> Result<Vec<RuleRow>> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "select rule_id, rule_type, rule_text from rule_library \
             where subject = $1 order by rule_id",
        )
        .bind(subject)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("fetch_rules failed on {} for '{subject}'", self.name))?;

        Ok(rows
            .into_iter()
            .map(|(rule_id, rule_type, rule_text)| RuleRow {
                rule_id,
                rule_type,
                rule_text,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// In-memory source for daemon tests and Postgres-free local runs. BTreeMaps
/// keep key order, so the sorted-output contract holds by construction.
#[derive(Debug, Clone, Default)]
pub struct MemoryEntrySource {
    name: &'static str,
    xml_configs: BTreeMap<String, BTreeMap<String, String>>,
    rules: BTreeMap<String, BTreeMap<String, RuleRow>>,
}

impl MemoryEntrySource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            xml_configs: BTreeMap::new(),
            rules: BTreeMap::new(),
        }
    }

    pub fn with_xml_config(
        mut self,
        subject: &str,
        uid: &str,
        xml_config: &str,
    ) -> Self {
        self.xml_configs
            .entry(subject.to_string())
            .or_default()
            .insert(uid.to_string(), xml_config.to_string());
        self
    }

    pub fn with_rule(
        mut self,
        subject: &str,
        rule_id: &str,
        rule_type: &str,
        rule_text: &str,
    ) -> Self {
        self.rules.entry(subject.to_string()).or_default().insert(
            rule_id.to_string(),
            RuleRow {
                rule_id: rule_id.to_string(),
                rule_type: rule_type.to_string(),
                rule_text: rule_text.to_string(),
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl EntrySource for MemoryEntrySource {
    fn environment_name(&self) -> &'static str {
        self.name
    }

    async fn list_subjects(&self) -> Result<Vec<String>> {
        Ok(self.xml_configs.keys().cloned().collect())
    }

    async fn fetch_xml_configs(&self, subject: &str) -> Result<Vec<XmlConfigRow>> {
        Ok(self
            .xml_configs
            .get(subject)
            .map(|m| {
                m.iter()
                    .map(|(uid, xml_config)| XmlConfigRow {
                        uid: uid.clone(),
                        xml_config: xml_config.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_rules(&self, subject: &str) -> Result<Vec<RuleRow>> {
        Ok(self
            .rules
            .get(subject)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default())
    }
}
