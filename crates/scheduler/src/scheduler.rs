// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Scheduler's (C8) top-level loop: reconciles every `VirtualWorkload`
//! in the namespace on a ≥30s requeue timer (step 5) and again whenever any
//! `Edge` changes (step 5's tie-breaking note: edge churn re-enqueues every
//! workload in the cluster, not just the one that happened to be watched).

use std::time::Duration;

use futures_util::StreamExt;
use kube::api::Api;
use kube::runtime::watcher::Event;
use tokio_util::sync::CancellationToken;

use kedge_core::{Edge, VirtualWorkload};
use kedge_store::ObjectStore;

use crate::placement::reconcile_workload;

/// Minimum interval between full-namespace requeues, per §4.8 step 5.
pub const REQUEUE_INTERVAL: Duration = Duration::from_secs(30);

async fn reconcile_all(store: &ObjectStore, namespace: &str) {
    let workloads_api: Api<VirtualWorkload> = store.namespaced(namespace);
    let workloads = match store.list(&workloads_api).await {
        Ok(workloads) => workloads,
        Err(e) => {
            tracing::warn!(%e, "listing workloads for scheduler sweep failed");
            return;
        }
    };
    for workload in workloads {
        let Some(name) = workload.metadata.name.clone() else { continue };
        if let Err(e) = reconcile_workload(store, namespace, &name).await {
            tracing::warn!(%e, workload = name, "scheduler reconcile failed");
        }
    }
}

/// Drives the scheduler until `cancel` fires.
pub async fn run(store: ObjectStore, namespace: String, cancel: CancellationToken) {
    let edges_api: Api<Edge> = store.cluster_scoped();
    let mut edge_events = Box::pin(store.watch(&edges_api));
    let mut ticker = tokio::time::interval(REQUEUE_INTERVAL);

    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            _ = ticker.tick() => reconcile_all(&store, &namespace).await,
            event = edge_events.next() => {
                match event {
                    Some(Ok(Event::Apply(_) | Event::Delete(_))) => reconcile_all(&store, &namespace).await,
                    Some(Ok(Event::Init | Event::InitApply(_) | Event::InitDone)) => {}
                    Some(Err(e)) => tracing::warn!(%e, "edge watch error in scheduler loop"),
                    None => return,
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
