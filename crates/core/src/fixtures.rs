// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terse test fixtures for the domain types, available to other crates via
//! the `test-support` feature (mirrors `oj-core`'s own test-builder
//! convention, minus the `builder!` macro itself: `ObjectMeta` doesn't fit
//! its flat-struct shape cleanly, so these are plain constructors instead).

use std::collections::BTreeMap;

use crate::edge::{Edge, EdgePhase, EdgeStatus, EdgeType};
use crate::placement::{Placement, PlacementStatus, WORKLOAD_LABEL};
use crate::workload::{PlacementStrategy, VirtualWorkload, WorkloadPlacementSpec};

pub fn edge(name: &str, edge_type: EdgeType) -> Edge {
    let mut e = Edge::default();
    e.metadata.name = Some(name.to_string());
    e.spec.edge_type = edge_type;
    e
}

pub fn edge_with_labels(name: &str, edge_type: EdgeType, labels: &[(&str, &str)]) -> Edge {
    let mut e = edge(name, edge_type);
    e.metadata.labels = Some(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect());
    e
}

pub fn edge_with_status(name: &str, edge_type: EdgeType, status: EdgeStatus) -> Edge {
    let mut e = edge(name, edge_type);
    e.status = Some(status);
    e
}

pub fn ready_edge_status(connected: bool) -> EdgeStatus {
    EdgeStatus {
        phase: if connected { EdgePhase::Ready } else { EdgePhase::Disconnected },
        connected,
        ..Default::default()
    }
}

pub fn workload(name: &str, selector: &[(&str, &str)], strategy: PlacementStrategy) -> VirtualWorkload {
    let mut w = VirtualWorkload::default();
    w.metadata.name = Some(name.to_string());
    w.spec.placement = WorkloadPlacementSpec {
        selector: selector.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<BTreeMap<_, _>>(),
        strategy: Some(strategy),
    };
    w
}

pub fn placement(workload: &str, edge: &str) -> Placement {
    let mut p = Placement::default();
    p.metadata.name = Some(crate::placement::PlacementSpec::name_for(workload, edge));
    p.metadata.labels = Some([(WORKLOAD_LABEL.to_string(), workload.to_string())].into_iter().collect());
    p.spec.workload_ref = workload.to_string();
    p.spec.edge_name = edge.to_string();
    p
}

pub fn placement_with_status(workload: &str, edge: &str, phase: &str, ready_replicas: i32) -> Placement {
    let mut p = placement(workload, edge);
    p.status = Some(PlacementStatus { phase: phase.to_string(), ready_replicas });
    p
}
