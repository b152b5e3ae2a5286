// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Status Aggregator (C9): rolls per-`Placement` status up into the
//! parent `VirtualWorkload`'s phase and replica counts.

use futures_util::StreamExt;
use kube::api::Api;
use kube::runtime::watcher::Event;
use tokio_util::sync::CancellationToken;

use kedge_core::workload::{EdgeBreakdown, VirtualWorkloadStatus, WorkloadPhase};
use kedge_core::{Placement, VirtualWorkload};
use kedge_store::ObjectStore;

use crate::error::SchedulerError;

/// Recomputes a workload's status from its current placements (§4.9):
/// `readyReplicas = sum(placement.readyReplicas)`, `availableReplicas ==
/// readyReplicas`, and a phase rule keyed on every placement being
/// `"Running"`.
pub fn compute_status(placements: &[Placement]) -> VirtualWorkloadStatus {
    if placements.is_empty() {
        return VirtualWorkloadStatus::default();
    }

    let ready_replicas: i32 =
        placements.iter().map(|p| p.status.as_ref().map_or(0, |s| s.ready_replicas)).sum();

    let all_running = placements.iter().all(|p| p.status.as_ref().is_some_and(|s| s.is_running()));
    let phase = if all_running { WorkloadPhase::Running } else { WorkloadPhase::Pending };

    let edges = placements
        .iter()
        .map(|p| EdgeBreakdown {
            edge_name: p.spec.edge_name.clone(),
            phase: p.status.as_ref().map(|s| s.phase.clone()).unwrap_or_default(),
            ready_replicas: p.status.as_ref().map_or(0, |s| s.ready_replicas),
        })
        .collect();

    VirtualWorkloadStatus { phase, ready_replicas, available_replicas: ready_replicas, edges }
}

/// Re-reads every placement labelled for `workload_name` and writes the
/// whole new status in one update (§4.9's "one update" rule); optimistic
/// concurrency conflicts are retried by `kedge_store::update_status_with_retry`.
pub async fn reconcile_workload_status(
    store: &ObjectStore,
    namespace: &str,
    workload_name: &str,
) -> Result<(), SchedulerError> {
    let placements_api: Api<Placement> = store.namespaced(namespace);
    let mine: Vec<Placement> = store
        .list(&placements_api)
        .await?
        .into_iter()
        .filter(|p| p.spec.workload_ref == workload_name)
        .collect();
    let status = compute_status(&mine);

    let workloads_api: Api<VirtualWorkload> = store.namespaced(namespace);
    kedge_store::update_status_with_retry(&workloads_api, workload_name, |_| status.clone()).await?;
    Ok(())
}

/// Watches `Placement` and re-aggregates its parent workload on every
/// applied/deleted event, until `cancel` fires.
pub async fn run(store: ObjectStore, namespace: String, cancel: CancellationToken) {
    let placements_api: Api<Placement> = store.namespaced(&namespace);
    let mut events = Box::pin(store.watch(&placements_api));

    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            event = events.next() => {
                let Some(event) = event else { return };
                let placement = match event {
                    Ok(Event::Apply(p)) | Ok(Event::Delete(p)) => p,
                    Ok(Event::Init | Event::InitApply(_) | Event::InitDone) => continue,
                    Err(e) => {
                        tracing::warn!(%e, "placement watch error");
                        continue;
                    }
                };
                if let Err(e) = reconcile_workload_status(&store, &namespace, &placement.spec.workload_ref).await {
                    tracing::warn!(%e, workload = placement.spec.workload_ref, "status aggregation failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
