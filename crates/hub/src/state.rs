// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared hub state, built once at startup and handed to every request
//! task as an `Arc`. Per the design notes, the Connection Registry and
//! the pickup table are the only parts of this that are mutated after
//! construction; everything else is read-only.

use std::sync::Arc;

use kedge_auth::{Authorizer, OidcVerifier, StaticTokenStore};
use kedge_store::ObjectStore;
use kedge_tunnel::{ConnectionRegistry, PickupTable};
use kube::Config;
use tokio_util::sync::CancellationToken;

/// Everything a request handler needs, shared across every connection.
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub pickups: Arc<PickupTable>,
    pub static_tokens: StaticTokenStore,
    pub oidc: Option<OidcVerifier>,
    pub authorizer: Authorizer,
    /// Carried through to every `LoginResponse` so the CLI can refresh an
    /// OIDC session on its own without the hub in the loop.
    pub oidc_client_id: String,
    pub oidc_client_secret: Option<String>,
    /// Base kube config, scoped per-request to the caller's logical
    /// cluster via [`kedge_store::ObjectStore::for_cluster`].
    pub base_kube_config: Config,
    /// Store scoped to the reconcilers' own administrative workspace
    /// (built from `--external-kcp-kubeconfig`, or `base_kube_config` if
    /// that flag is unset).
    pub system_store: ObjectStore,
    pub workload_namespace: String,
    pub external_url: String,
    pub dev_mode: bool,
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Builds the `ObjectStore` scoped to `cluster` for a single request,
    /// sharing every other setting (auth, TLS, timeouts) from
    /// `base_kube_config`.
    pub fn store_for_cluster(
        &self,
        cluster: kedge_core::LogicalCluster,
    ) -> Result<ObjectStore, kedge_store::StoreError> {
        ObjectStore::for_cluster(&self.base_kube_config, cluster)
    }
}
