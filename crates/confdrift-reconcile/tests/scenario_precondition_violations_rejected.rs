use confdrift_reconcile::*;

#[test]
fn scenario_duplicate_key_in_staging_is_rejected_with_key_named() {
    let staging = vec![
        Entry::new("a", "1"),
        Entry::new("b", "2"),
        Entry::new("b", "2-again"),
    ];
    let production = vec![Entry::new("a", "1")];

    let err = reconcile_checked(&staging, &production).unwrap_err();
    assert_eq!(
        err,
        PreconditionViolation::DuplicateKey {
            side: Side::Staging,
            key: "b".to_string(),
        }
    );
    assert!(err.to_string().contains("'b'"));
    assert!(err.to_string().contains("staging"));
}

#[test]
fn scenario_unsorted_production_is_rejected_before_any_merge() {
    let staging = vec![Entry::new("a", "1")];
    let production = vec![Entry::new("b", "2"), Entry::new("a", "1")];

    let err = reconcile_checked(&staging, &production).unwrap_err();
    assert_eq!(
        err,
        PreconditionViolation::UnsortedInput {
            side: Side::Production,
            key: "a".to_string(),
        }
    );
}

#[test]
fn scenario_checked_path_passes_through_well_formed_input() {
    let staging = vec![Entry::new("a", "x"), Entry::new("b", "y")];
    let production = vec![Entry::new("a", "x"), Entry::new("b", "z")];

    let diffs = reconcile_checked(&staging, &production).expect("well-formed input");
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].key, "b");
}

#[test]
fn scenario_sort_entries_establishes_the_checked_precondition() {
    let mut unordered = vec![
        Entry::new("c", "3"),
        Entry::new("a", "1"),
        Entry::new("b", "2"),
    ];
    sort_entries(&mut unordered);

    assert!(reconcile_checked(&unordered, &unordered).is_ok());
}
