use serde::{Deserialize, Serialize};

/// A single keyed payload value from one environment's dataset.
///
/// Keys must be unique within one sequence; sequences handed to the engine
/// must be sorted ascending by byte-order key (see [`sort_entries`] and
/// [`reconcile_checked`]).
///
/// [`sort_entries`]: crate::sort_entries
/// [`reconcile_checked`]: crate::reconcile_checked
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    /// Opaque content to compare (serialized XML, rule text, ...). Equality
    /// is plain string equality; no structure-aware diffing.
    pub payload: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }
}

/// How one key differs between the staging and production sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    OnlyInStaging,
    OnlyInProduction,
    Changed,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::OnlyInStaging => "only_in_staging",
            DiffStatus::OnlyInProduction => "only_in_production",
            DiffStatus::Changed => "changed",
        }
    }
}

/// One reported difference.
///
/// Invariant: `staging` is `Some` iff `status != OnlyInProduction`, and
/// `production` is `Some` iff `status != OnlyInStaging`. Keys whose payloads
/// are equal on both sides produce no record at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub key: String,
    pub status: DiffStatus,
    pub staging: Option<String>,
    pub production: Option<String>,
}

impl DiffRecord {
    pub fn only_in_staging(entry: &Entry) -> Self {
        Self {
            key: entry.key.clone(),
            status: DiffStatus::OnlyInStaging,
            staging: Some(entry.payload.clone()),
            production: None,
        }
    }

    pub fn only_in_production(entry: &Entry) -> Self {
        Self {
            key: entry.key.clone(),
            status: DiffStatus::OnlyInProduction,
            staging: None,
            production: Some(entry.payload.clone()),
        }
    }

    pub fn changed(staging: &Entry, production: &Entry) -> Self {
        Self {
            key: staging.key.clone(),
            status: DiffStatus::Changed,
            staging: Some(staging.payload.clone()),
            production: Some(production.payload.clone()),
        }
    }
}

/// Which input sequence a precondition violation was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Staging,
    Production,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Staging => "staging",
            Side::Production => "production",
        }
    }
}

/// Error returned by [`reconcile_checked`] when an input sequence breaks the
/// engine's precondition (sorted ascending, no duplicate keys).
///
/// The raw [`reconcile`] entry point does not detect these; malformed input
/// there is undefined behavior by contract. Production callers go through
/// the checked entry point.
///
/// [`reconcile`]: crate::reconcile
/// [`reconcile_checked`]: crate::reconcile_checked
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreconditionViolation {
    /// The same key appeared more than once within one side.
    DuplicateKey { side: Side, key: String },
    /// A key was out of ascending order within one side.
    UnsortedInput { side: Side, key: String },
}

impl std::fmt::Display for PreconditionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreconditionViolation::DuplicateKey { side, key } => {
                write!(f, "duplicate key '{}' in {} sequence", key, side.as_str())
            }
            PreconditionViolation::UnsortedInput { side, key } => {
                write!(
                    f,
                    "unsorted {} sequence: key '{}' out of ascending order",
                    side.as_str(),
                    key
                )
            }
        }
    }
}

impl std::error::Error for PreconditionViolation {}
