// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure edge-matching and strategy-selection logic for the Scheduler (C8),
//! steps 2–3: `matched = edges satisfying the selector`, `selected =
//! strategy(matched)`.

use std::collections::BTreeMap;

use kedge_core::{Edge, PlacementStrategy};

/// `true` iff `edge`'s labels satisfy `selector`. An empty selector matches
/// every edge.
pub fn matches_selector(edge: &Edge, selector: &BTreeMap<String, String>) -> bool {
    if selector.is_empty() {
        return true;
    }
    let labels = edge.metadata.labels.as_ref();
    selector.iter().all(|(k, v)| labels.and_then(|l| l.get(k)).is_some_and(|got| got == v))
}

/// `matched` from step 2: edges in `edges` whose labels satisfy `selector`,
/// preserving `edges`' input order.
pub fn matched_edges<'a>(edges: &'a [Edge], selector: &BTreeMap<String, String>) -> Vec<&'a Edge> {
    edges.iter().filter(|e| matches_selector(e, selector)).collect()
}

/// `selected` from step 3: `Spread` keeps the whole matched set; `Singleton`
/// keeps only the first element (object-store listing order), so the
/// scheduler never randomises the tie-break.
pub fn select_for_strategy<'a>(matched: &[&'a Edge], strategy: PlacementStrategy) -> Vec<&'a Edge> {
    match strategy {
        PlacementStrategy::Spread => matched.to_vec(),
        PlacementStrategy::Singleton => matched.first().copied().into_iter().collect(),
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
