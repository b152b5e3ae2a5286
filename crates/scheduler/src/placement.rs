// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Scheduler (C8): maps each `VirtualWorkload` to a set of matching
//! edges and reconciles `Placement` objects to reflect that set.

use std::collections::BTreeSet;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{Api, DeleteParams, PostParams};

use kedge_core::placement::WORKLOAD_LABEL;
use kedge_core::{Edge, Placement, PlacementSpec, VirtualWorkload};
use kedge_store::ObjectStore;

use crate::error::SchedulerError;
use crate::selection::{matched_edges, select_for_strategy};

/// Placement names to delete and edge names still needing a placement
/// created, computed from the workload's currently `selected` edge set and
/// the placements already labelled for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementDiff {
    pub to_delete: Vec<String>,
    pub to_create: Vec<String>,
}

/// Step 4: diffs `selected_edge_names` against `existing` (placements
/// already labelled for this workload).
pub fn diff_placements(selected_edge_names: &BTreeSet<String>, existing: &[Placement]) -> PlacementDiff {
    let existing_edge_names: BTreeSet<&str> =
        existing.iter().map(|p| p.spec.edge_name.as_str()).collect();

    let to_delete = existing
        .iter()
        .filter(|p| !selected_edge_names.contains(p.spec.edge_name.as_str()))
        .filter_map(|p| p.metadata.name.clone())
        .collect();

    let to_create = selected_edge_names
        .iter()
        .filter(|name| !existing_edge_names.contains(name.as_str()))
        .cloned()
        .collect();

    PlacementDiff { to_delete, to_create }
}

fn workload_owner_ref(workload: &VirtualWorkload) -> Option<OwnerReference> {
    Some(OwnerReference {
        api_version: "kedge.faros.sh/v1alpha1".to_string(),
        kind: "VirtualWorkload".to_string(),
        name: workload.metadata.name.clone()?,
        uid: workload.metadata.uid.clone()?,
        controller: Some(true),
        block_owner_deletion: Some(true),
        ..Default::default()
    })
}

/// Runs the full scheduler state machine (§4.8 steps 1–4) for one
/// workload.
pub async fn reconcile_workload(
    store: &ObjectStore,
    namespace: &str,
    workload_name: &str,
) -> Result<(), SchedulerError> {
    let workloads_api: Api<VirtualWorkload> = store.namespaced(namespace);
    let workload = store.get(&workloads_api, workload_name).await?;

    let edges_api: Api<Edge> = store.cluster_scoped();
    let edges = store.list(&edges_api).await?;
    let matched = matched_edges(&edges, &workload.spec.placement.selector);
    let selected = select_for_strategy(&matched, workload.spec.placement.strategy());
    let selected_names: BTreeSet<String> =
        selected.iter().filter_map(|e| e.metadata.name.clone()).collect();

    let placements_api: Api<Placement> = store.namespaced(namespace);
    let existing: Vec<Placement> = store
        .list(&placements_api)
        .await?
        .into_iter()
        .filter(|p| p.spec.workload_ref == workload_name)
        .collect();

    let diff = diff_placements(&selected_names, &existing);

    for name in &diff.to_delete {
        tracing::info!(workload = workload_name, placement = name, "deleting stale placement");
        placements_api.delete(name, &DeleteParams::default()).await?;
    }

    let owner_ref = workload_owner_ref(&workload);
    for edge_name in &diff.to_create {
        let name = PlacementSpec::name_for(workload_name, edge_name);
        tracing::info!(workload = workload_name, placement = %name, edge = edge_name, "creating placement");
        let mut placement = Placement::new(
            &name,
            PlacementSpec {
                workload_ref: workload_name.to_string(),
                edge_name: edge_name.clone(),
                replicas: Some(workload.spec.replicas),
            },
        );
        placement.metadata.labels =
            Some([(WORKLOAD_LABEL.to_string(), workload_name.to_string())].into_iter().collect());
        placement.metadata.owner_references = owner_ref.clone().into_iter().collect();
        placements_api.create(&PostParams::default(), &placement).await?;
    }

    Ok(())
}

#[cfg(test)]
#[path = "placement_tests.rs"]
mod tests;
