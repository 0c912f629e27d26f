use crate::{DiffRecord, Entry, PreconditionViolation, Side};

/// Stable ascending sort by key (byte order). Run this before [`reconcile`]
/// when the source does not guarantee ordering.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.key.cmp(&b.key));
}

/// Deterministic merge-diff over two sorted, duplicate-free sequences.
///
/// Single pass, O(n+m) time, no allocation beyond the output. Every key from
/// either side lands in exactly one record, except matched keys with equal
/// payloads, which are suppressed. Output keys are strictly ascending.
///
/// Precondition: both inputs sorted ascending by key, no duplicate keys
/// within one side. Not detected here; use [`reconcile_checked`] when the
/// input discipline is not already guaranteed.
pub fn reconcile(staging: &[Entry], production: &[Entry]) -> Vec<DiffRecord> {
    let mut out: Vec<DiffRecord> = Vec::new();
    let mut s = 0;
    let mut p = 0;

    while s < staging.len() && p < production.len() {
        let se = &staging[s];
        let pe = &production[p];
        match se.key.cmp(&pe.key) {
            std::cmp::Ordering::Equal => {
                if se.payload != pe.payload {
                    out.push(DiffRecord::changed(se, pe));
                }
                s += 1;
                p += 1;
            }
            std::cmp::Ordering::Less => {
                out.push(DiffRecord::only_in_staging(se));
                s += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(DiffRecord::only_in_production(pe));
                p += 1;
            }
        }
    }

    // Drain whichever side remains. Must be explicit: the merge loop above
    // exits as soon as either cursor runs out, so a longer tail would be
    // silently dropped without these.
    while s < staging.len() {
        out.push(DiffRecord::only_in_staging(&staging[s]));
        s += 1;
    }
    while p < production.len() {
        out.push(DiffRecord::only_in_production(&production[p]));
        p += 1;
    }

    out
}

/// Check one side's ordering/uniqueness precondition.
fn check_sequence(entries: &[Entry], side: Side) -> Result<(), PreconditionViolation> {
    for pair in entries.windows(2) {
        match pair[0].key.cmp(&pair[1].key) {
            std::cmp::Ordering::Less => {}
            std::cmp::Ordering::Equal => {
                return Err(PreconditionViolation::DuplicateKey {
                    side,
                    key: pair[1].key.clone(),
                });
            }
            std::cmp::Ordering::Greater => {
                return Err(PreconditionViolation::UnsortedInput {
                    side,
                    key: pair[1].key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Precondition-enforced entry point. The production path.
///
/// Validates that both sides are sorted ascending with no duplicate keys,
/// then delegates to [`reconcile`]. A violation names the offending side and
/// key rather than letting the merge walk produce garbage.
pub fn reconcile_checked(
    staging: &[Entry],
    production: &[Entry],
) -> Result<Vec<DiffRecord>, PreconditionViolation> {
    check_sequence(staging, Side::Staging)?;
    check_sequence(production, Side::Production)?;
    Ok(reconcile(staging, production))
}
