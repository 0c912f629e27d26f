use confdrift_reconcile::*;

#[test]
fn scenario_changed_payload_emits_single_record_with_both_sides() {
    let staging = vec![Entry::new("a", "x"), Entry::new("b", "y")];
    let production = vec![Entry::new("a", "x"), Entry::new("b", "z")];

    let diffs = reconcile(&staging, &production);

    assert_eq!(
        diffs,
        vec![DiffRecord {
            key: "b".to_string(),
            status: DiffStatus::Changed,
            staging: Some("y".to_string()),
            production: Some("z".to_string()),
        }]
    );
}

#[test]
fn scenario_changed_record_carries_payloads_per_presence_invariant() {
    let staging = vec![Entry::new("rule-9", "old text")];
    let production = vec![Entry::new("rule-9", "new text")];

    let diffs = reconcile(&staging, &production);
    assert_eq!(diffs.len(), 1);
    let d = &diffs[0];
    assert_eq!(d.status, DiffStatus::Changed);
    assert!(d.staging.is_some() && d.production.is_some());
}
