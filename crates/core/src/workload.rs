// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `VirtualWorkload` — a desired cross-edge workload definition. The
//! scheduler (`kedge_scheduler::placement`) fans one of these out into a
//! `Placement` per matching edge; the aggregator
//! (`kedge_scheduler::aggregate`) rolls their reported status back up here.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a workload's matched edges are turned into placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum PlacementStrategy {
    /// Place on every matching edge.
    Spread,
    /// Place on exactly one matching edge (object-store listing order).
    Singleton,
}

crate::simple_display! {
    PlacementStrategy {
        Spread => "Spread",
        Singleton => "Singleton",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkloadPlacementSpec {
    /// Label selector matched against `Edge` labels. `None`/empty matches
    /// every edge in the workload's logical cluster.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub selector: BTreeMap<String, String>,
    pub strategy: Option<PlacementStrategy>,
}

impl WorkloadPlacementSpec {
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy.unwrap_or(PlacementStrategy::Spread)
    }
}

/// Either a simple image reference or a full pod template, exactly one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkloadTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_template: Option<serde_json::Value>,
}

#[derive(Debug, Clone, CustomResource, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "kedge.faros.sh",
    version = "v1alpha1",
    kind = "VirtualWorkload",
    plural = "virtualworkloads",
    namespaced,
    status = "VirtualWorkloadStatus",
    derive = "Default"
)]
pub struct VirtualWorkloadSpec {
    #[serde(default)]
    pub replicas: i32,
    pub placement: WorkloadPlacementSpec,
    #[serde(flatten)]
    pub template: WorkloadTemplate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum WorkloadPhase {
    #[default]
    Pending,
    Running,
    Failed,
    Unknown,
}

crate::simple_display! {
    WorkloadPhase {
        Pending => "Pending",
        Running => "Running",
        Failed => "Failed",
        Unknown => "Unknown",
    }
}

/// Per-edge rollup reported by [`crate::workload::VirtualWorkloadStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeBreakdown {
    pub edge_name: String,
    pub phase: String,
    #[serde(default)]
    pub ready_replicas: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VirtualWorkloadStatus {
    #[serde(default)]
    pub phase: WorkloadPhase,
    #[serde(default)]
    pub ready_replicas: i32,
    #[serde(default)]
    pub available_replicas: i32,
    #[serde(default)]
    pub edges: Vec<EdgeBreakdown>,
}

#[cfg(test)]
#[path = "workload_tests.rs"]
mod tests;
