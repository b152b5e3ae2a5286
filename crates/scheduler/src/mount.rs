// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Edge Lifecycle mount reconciler (C10, mount half): for `kubernetes`
//! edges, keeps `status.url` and an external mount-workspace object in sync
//! with the edge's readiness; for `server` edges (and `kubernetes` edges
//! that have dropped out of `Ready`), clears both.
//!
//! The "external mount-workspace object" itself is out of scope (§1
//! Non-goals name the object store's own implementation); this reconciler
//! models its lifecycle with a `ConfigMap` owned by the `Edge`, which is
//! garbage-collected on `Edge` deletion the same way the real mount
//! workspace would be.

use futures_util::StreamExt;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{Api, DeleteParams, PostParams};
use kube::runtime::watcher::Event;
use tokio_util::sync::CancellationToken;

use kedge_core::edge::{EdgePhase, EdgeType};
use kedge_core::Edge;
use kedge_store::ObjectStore;

use crate::error::SchedulerError;

/// Builds the deterministic external URL a `kubernetes` edge's `k8s` proxy
/// is reached through (§4.10).
pub fn mount_url(external_base: &str, cluster: &str, edge_name: &str) -> String {
    format!(
        "{}/services/edges-proxy/clusters/{cluster}/apis/kedge.faros.sh/v1alpha1/edges/{edge_name}/k8s",
        external_base.trim_end_matches('/')
    )
}

/// The workspace's deterministic name, derived from the edge it mounts.
pub fn workspace_name(edge_name: &str) -> String {
    format!("edge-mount-{edge_name}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountAction {
    SetUrlAndEnsureWorkspace(String),
    ClearUrlAndDeleteWorkspace,
}

/// Decides what the mount reconciler should do for `edge`. `kubernetes`
/// edges get a URL and workspace only while `Ready`; everything else (a
/// `server` edge, or a `kubernetes` edge that isn't `Ready`) is cleared.
pub fn mount_decision(edge: &Edge, external_base: &str, cluster: &str) -> MountAction {
    let name = edge.metadata.name.as_deref().unwrap_or_default();
    let ready = matches!(edge.status.as_ref().map(|s| s.phase), Some(EdgePhase::Ready));
    if edge.spec.edge_type == EdgeType::Kubernetes && ready {
        MountAction::SetUrlAndEnsureWorkspace(mount_url(external_base, cluster, name))
    } else {
        MountAction::ClearUrlAndDeleteWorkspace
    }
}

fn edge_owner_ref(edge: &Edge) -> Option<OwnerReference> {
    Some(OwnerReference {
        api_version: "kedge.faros.sh/v1alpha1".to_string(),
        kind: "Edge".to_string(),
        name: edge.metadata.name.clone()?,
        uid: edge.metadata.uid.clone()?,
        controller: Some(true),
        block_owner_deletion: Some(true),
        ..Default::default()
    })
}

/// Applies `decision` for `edge`: patches `status.url` and ensures or
/// deletes the mount-workspace `ConfigMap` in `workspace_namespace`.
pub async fn apply_mount_decision(
    store: &ObjectStore,
    edge: &Edge,
    workspace_namespace: &str,
    decision: MountAction,
) -> Result<(), SchedulerError> {
    let name = edge.metadata.name.clone().unwrap_or_default();
    let edges_api: Api<Edge> = store.cluster_scoped();
    let workspaces_api: Api<ConfigMap> = store.namespaced(workspace_namespace);
    let workspace = workspace_name(&name);

    match decision {
        MountAction::SetUrlAndEnsureWorkspace(url) => {
            kedge_store::update_status_with_retry(&edges_api, &name, move |e: &Edge| {
                let mut status = e.status.clone().unwrap_or_default();
                status.url = Some(url.clone());
                status
            })
            .await?;
            ensure_workspace(&workspaces_api, &workspace, edge).await?;
        }
        MountAction::ClearUrlAndDeleteWorkspace => {
            kedge_store::update_status_with_retry(&edges_api, &name, |e: &Edge| {
                let mut status = e.status.clone().unwrap_or_default();
                status.url = None;
                status
            })
            .await?;
            delete_workspace(&workspaces_api, &workspace).await?;
        }
    }
    Ok(())
}

async fn ensure_workspace(api: &Api<ConfigMap>, name: &str, edge: &Edge) -> Result<(), SchedulerError> {
    if api.get_opt(name).await?.is_some() {
        return Ok(());
    }
    let mut workspace = ConfigMap::default();
    workspace.metadata.name = Some(name.to_string());
    workspace.metadata.owner_references = edge_owner_ref(edge).into_iter().collect();
    workspace.data =
        Some([("edgeName".to_string(), edge.metadata.name.clone().unwrap_or_default())].into_iter().collect());
    api.create(&PostParams::default(), &workspace).await?;
    Ok(())
}

async fn delete_workspace(api: &Api<ConfigMap>, name: &str) -> Result<(), SchedulerError> {
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(e)) if e.code == 404 => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Watches `Edge` and keeps its mount state in sync with its phase,
/// applying `mount_decision` on every applied edge (a deleted edge's
/// workspace is reclaimed by its owner reference, not by this loop).
pub async fn run(
    store: ObjectStore,
    workspace_namespace: String,
    external_base: String,
    cancel: CancellationToken,
) {
    let edges_api: Api<Edge> = store.cluster_scoped();
    let mut events = Box::pin(store.watch(&edges_api));

    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            event = events.next() => {
                let Some(event) = event else { return };
                let edge = match event {
                    Ok(Event::Apply(e)) => e,
                    Ok(Event::Delete(_) | Event::Init | Event::InitApply(_) | Event::InitDone) => continue,
                    Err(e) => {
                        tracing::warn!(%e, "edge watch error");
                        continue;
                    }
                };
                let decision = mount_decision(&edge, &external_base, store.cluster().as_str());
                let edge_name = edge.metadata.name.clone().unwrap_or_default();
                if let Err(e) = apply_mount_decision(&store, &edge, &workspace_namespace, decision).await {
                    tracing::warn!(%e, edge = %edge_name, "mount reconciliation failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "mount_tests.rs"]
mod tests;
