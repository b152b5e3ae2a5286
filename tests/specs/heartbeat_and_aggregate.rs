// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! §8 "Heartbeat timeout" and "Aggregator phase" properties, and the
//! mount-URL shape property, run against the same pure functions
//! `kedge-scheduler`'s reconcilers call — no object store required.

use chrono::{DateTime, Utc};
use kedge_core::fixtures;
use kedge_core::heartbeat::TIMEOUT;
use kedge_scheduler::aggregate::compute_status;
use kedge_scheduler::lifecycle::heartbeat_decision;
use kedge_scheduler::mount::mount_url;

fn rfc3339_at(epoch_ms: u64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64).expect("valid timestamp").to_rfc3339()
}

#[test]
fn heartbeat_older_than_timeout_flips_connected_edge_to_disconnected() {
    let last_heartbeat_ms: u64 = 1_000_000;
    let mut status = fixtures::ready_edge_status(true);
    status.last_heartbeat_time = Some(rfc3339_at(last_heartbeat_ms));

    let now = last_heartbeat_ms + TIMEOUT.as_millis() as u64 + 1;
    let decision = heartbeat_decision(&status, now, TIMEOUT).expect("must flip to disconnected");

    assert!(!decision.connected);
    assert_eq!(decision.phase, kedge_core::EdgePhase::Disconnected);
}

#[test]
fn heartbeat_within_timeout_leaves_connected_edge_alone() {
    let last_heartbeat_ms: u64 = 1_000_000;
    let mut status = fixtures::ready_edge_status(true);
    status.last_heartbeat_time = Some(rfc3339_at(last_heartbeat_ms));

    let now = last_heartbeat_ms + TIMEOUT.as_millis() as u64 - 1;
    assert!(heartbeat_decision(&status, now, TIMEOUT).is_none());
}

#[test]
fn already_disconnected_edges_are_never_rewritten() {
    let status = fixtures::ready_edge_status(false);
    assert!(heartbeat_decision(&status, u64::MAX, TIMEOUT).is_none());
}

#[test]
fn aggregator_phase_is_pending_with_no_placements() {
    let status = compute_status(&[]);
    assert_eq!(status.phase, kedge_core::workload::WorkloadPhase::Pending);
}

#[test]
fn aggregator_phase_is_pending_when_any_placement_is_not_running() {
    let placements = vec![
        fixtures::placement_with_status("w", "e1", "Running", 1),
        fixtures::placement_with_status("w", "e2", "Pending", 0),
    ];
    let status = compute_status(&placements);
    assert_eq!(status.phase, kedge_core::workload::WorkloadPhase::Pending);
    assert_eq!(status.ready_replicas, 1);
}

#[test]
fn aggregator_phase_is_running_when_every_placement_is_running() {
    let placements = vec![
        fixtures::placement_with_status("w", "e1", "Running", 2),
        fixtures::placement_with_status("w", "e2", "Running", 3),
    ];
    let status = compute_status(&placements);
    assert_eq!(status.phase, kedge_core::workload::WorkloadPhase::Running);
    assert_eq!(status.ready_replicas, 5);
    assert_eq!(status.available_replicas, 5);
    assert_eq!(status.edges.len(), 2);
}

#[test]
fn mount_url_has_the_exact_shape_the_property_names() {
    let url = mount_url("https://h", "C", "E");
    assert_eq!(
        url,
        "https://h/services/edges-proxy/clusters/C/apis/kedge.faros.sh/v1alpha1/edges/E/k8s"
    );
}
