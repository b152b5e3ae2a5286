// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn strategy_defaults_to_spread() {
    let spec = WorkloadPlacementSpec::default();
    assert_eq!(spec.strategy(), PlacementStrategy::Spread);
}

#[test]
fn strategy_honors_explicit_singleton() {
    let spec = WorkloadPlacementSpec {
        strategy: Some(PlacementStrategy::Singleton),
        ..Default::default()
    };
    assert_eq!(spec.strategy(), PlacementStrategy::Singleton);
}

#[test]
fn workload_phase_displays_pascal_case() {
    assert_eq!(WorkloadPhase::Running.to_string(), "Running");
    assert_eq!(WorkloadPhase::Unknown.to_string(), "Unknown");
}

#[test]
fn status_defaults_to_pending_with_no_edges() {
    let status = VirtualWorkloadStatus::default();
    assert_eq!(status.phase, WorkloadPhase::Pending);
    assert!(status.edges.is_empty());
}
