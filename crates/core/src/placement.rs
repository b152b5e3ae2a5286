// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Placement` — one `VirtualWorkload` → `Edge` binding. Created and deleted
//! exclusively by the scheduler (`kedge_scheduler::placement`); its status
//! is reported by the agent and rolled up by the aggregator.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label the scheduler stamps on every `Placement` it owns, so the
/// aggregator's watch can find all placements for a workload without
/// walking owner references.
pub const WORKLOAD_LABEL: &str = "kedge.faros.sh/virtualworkload";

#[derive(Debug, Clone, CustomResource, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "kedge.faros.sh",
    version = "v1alpha1",
    kind = "Placement",
    plural = "placements",
    namespaced,
    status = "PlacementStatus",
    derive = "Default"
)]
pub struct PlacementSpec {
    pub workload_ref: String,
    pub edge_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

impl PlacementSpec {
    /// The deterministic name the scheduler assigns placements:
    /// `"{workload}-{edge}"`.
    pub fn name_for(workload: &str, edge: &str) -> String {
        format!("{workload}-{edge}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlacementStatus {
    /// Phase string as reported by the agent; not a closed enum since the
    /// agent is an external collaborator free to report its own values.
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub ready_replicas: i32,
}

impl PlacementStatus {
    pub fn is_running(&self) -> bool {
        self.phase == "Running"
    }
}

#[cfg(test)]
#[path = "placement_tests.rs"]
mod tests;
