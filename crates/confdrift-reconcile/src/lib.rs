//! confdrift-reconcile
//!
//! Reconciliation engine: a deterministic, key-ordered merge-diff over two
//! sorted sequences of `(key, payload)` entries.
//!
//! Architectural decisions:
//! - Single generic engine; dataset-specific shapes (XML configs, rules) are
//!   mapped to [`Entry`] at the boundary, never inside this crate
//! - Matched keys with equal payloads are suppressed from the output
//! - Tails left after either side is exhausted are drained explicitly
//! - Duplicate or unsorted input is rejected by the checked entry point
//!
//! Deterministic, pure logic. No IO. No database calls.

mod engine;
mod types;

pub use engine::{reconcile, reconcile_checked, sort_entries};
pub use types::*;
