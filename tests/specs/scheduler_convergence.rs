// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler convergence and idempotence (§8), and the two end-to-end
//! scheduler scenarios from §8: "Scheduler Singleton" and "Scheduler
//! Spread drop". Exercised through the scheduler's pure selection/diff
//! functions rather than a live object store, since those functions are
//! exactly where the selected-set computation lives.

use kedge_core::fixtures;
use kedge_core::EdgeType;
use kedge_scheduler::placement::diff_placements;
use kedge_scheduler::selection::{matched_edges, select_for_strategy};

use std::collections::BTreeSet;

#[test]
fn singleton_strategy_picks_exactly_one_of_the_matching_edges() {
    let e1 = fixtures::edge("e1", EdgeType::Kubernetes);
    let e2 = fixtures::edge("e2", EdgeType::Kubernetes);
    let edges = vec![e1, e2];

    let matched = matched_edges(&edges, &Default::default());
    let selected = select_for_strategy(&matched, kedge_core::PlacementStrategy::Singleton);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].metadata.name.as_deref(), Some("e1"));

    let selected_names: BTreeSet<String> =
        selected.iter().filter_map(|e| e.metadata.name.clone()).collect();
    let diff = diff_placements(&selected_names, &[]);
    assert_eq!(diff.to_create, vec!["e1".to_string()]);
    assert!(diff.to_delete.is_empty());
}

#[test]
fn spread_strategy_drops_a_placement_when_its_edge_no_longer_matches() {
    let e1 = fixtures::edge_with_labels("e1", EdgeType::Kubernetes, &[("env", "prod")]);
    let e2 = fixtures::edge_with_labels("e2", EdgeType::Kubernetes, &[("env", "prod")]);
    let e3 = fixtures::edge_with_labels("e3", EdgeType::Kubernetes, &[("env", "dev")]);
    let selector = [("env".to_string(), "prod".to_string())].into_iter().collect();

    let edges = vec![e1.clone(), e2.clone(), e3.clone()];
    let matched = matched_edges(&edges, &selector);
    let selected = select_for_strategy(&matched, kedge_core::PlacementStrategy::Spread);
    assert_eq!(selected.len(), 2);

    let existing = vec![fixtures::placement("w", "e1"), fixtures::placement("w", "e2")];
    let selected_names: BTreeSet<String> =
        selected.iter().filter_map(|e| e.metadata.name.clone()).collect();
    let diff = diff_placements(&selected_names, &existing);
    assert!(diff.to_create.is_empty());
    assert!(diff.to_delete.is_empty());

    // e1 is relabelled out of the selector.
    let e1_relabelled = fixtures::edge_with_labels("e1", EdgeType::Kubernetes, &[("env", "dev")]);
    let edges_after = vec![e1_relabelled, e2, e3];
    let matched_after = matched_edges(&edges_after, &selector);
    let selected_after = select_for_strategy(&matched_after, kedge_core::PlacementStrategy::Spread);
    let selected_after_names: BTreeSet<String> =
        selected_after.iter().filter_map(|e| e.metadata.name.clone()).collect();

    let diff_after = diff_placements(&selected_after_names, &existing);
    assert_eq!(diff_after.to_delete, vec![kedge_core::PlacementSpec::name_for("w", "e1")]);
    assert!(diff_after.to_create.is_empty(), "e2's placement must survive untouched");
}

#[test]
fn reconciling_the_same_selected_set_twice_produces_no_further_writes() {
    let e1 = fixtures::edge("e1", EdgeType::Kubernetes);
    let e2 = fixtures::edge("e2", EdgeType::Kubernetes);
    let edges = vec![e1, e2];

    let matched = matched_edges(&edges, &Default::default());
    let selected = select_for_strategy(&matched, kedge_core::PlacementStrategy::Spread);
    let selected_names: BTreeSet<String> =
        selected.iter().filter_map(|e| e.metadata.name.clone()).collect();

    let first_pass_existing: Vec<_> = vec![];
    let diff1 = diff_placements(&selected_names, &first_pass_existing);
    assert_eq!(diff1.to_create.len(), 2);

    let after_create = vec![fixtures::placement("w", "e1"), fixtures::placement("w", "e2")];
    let diff2 = diff_placements(&selected_names, &after_create);
    assert!(diff2.to_create.is_empty());
    assert!(diff2.to_delete.is_empty(), "an unchanged selected set must be a no-op reconcile");
}
