// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use kedge_core::fixtures;

fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn creates_placements_for_newly_selected_edges_with_none_existing() {
    let diff = diff_placements(&names(&["a", "b"]), &[]);
    assert!(diff.to_delete.is_empty());
    let mut created = diff.to_create;
    created.sort();
    assert_eq!(created, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn deletes_placements_whose_edge_is_no_longer_selected() {
    let existing = vec![fixtures::placement("w", "stale-edge")];
    let diff = diff_placements(&names(&[]), &existing);
    assert_eq!(diff.to_delete, vec![PlacementSpec::name_for("w", "stale-edge")]);
    assert!(diff.to_create.is_empty());
}

#[test]
fn leaves_placements_whose_edge_is_still_selected_alone() {
    let existing = vec![fixtures::placement("w", "a")];
    let diff = diff_placements(&names(&["a"]), &existing);
    assert!(diff.to_delete.is_empty());
    assert!(diff.to_create.is_empty());
}

#[test]
fn diff_is_idempotent_when_selected_set_exactly_matches_existing() {
    let existing = vec![fixtures::placement("w", "a"), fixtures::placement("w", "b")];
    let diff = diff_placements(&names(&["a", "b"]), &existing);
    assert!(diff.to_delete.is_empty());
    assert!(diff.to_create.is_empty());
}

#[test]
fn computes_mixed_create_and_delete_in_one_pass() {
    let existing = vec![fixtures::placement("w", "a"), fixtures::placement("w", "stale")];
    let diff = diff_placements(&names(&["a", "b"]), &existing);
    assert_eq!(diff.to_delete, vec![PlacementSpec::name_for("w", "stale")]);
    assert_eq!(diff.to_create, vec!["b".to_string()]);
}
