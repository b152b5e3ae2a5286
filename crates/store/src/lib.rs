// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! A thin typed wrapper over `kube::Api<T>` giving get/list/watch/
//! update-status with optimistic concurrency, scoped to a logical
//! cluster. The declarative resource store itself (kcp) is an external
//! collaborator per §1 — everything here is a pass-through to `kube::Api`
//! plus the retry policy §7 calls for.

pub mod cluster_client;
pub mod error;
pub mod retry;

use futures_util::{Stream, StreamExt};
use kube::api::{Api, ListParams};
use kube::runtime::watcher::{self, Event};
use kube::{Client, Config, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;

use kedge_core::LogicalCluster;

pub use error::StoreError;
pub use retry::{update_status_with_retry, MAX_CONFLICT_RETRIES};

/// A `kube::Client` scoped to one logical cluster, plus the namespace (if
/// any) namespaced resources in that cluster should be read/written
/// under.
#[derive(Clone)]
pub struct ObjectStore {
    client: Client,
    cluster: LogicalCluster,
}

impl ObjectStore {
    /// Scopes `base` to `cluster` by rewriting its API server URL.
    pub fn for_cluster(base: &Config, cluster: LogicalCluster) -> Result<Self, StoreError> {
        let client = cluster_client::scoped_client(base, &cluster)?;
        Ok(Self { client, cluster })
    }

    /// Constructs directly from an already-scoped client, used by tests
    /// and by callers that manage their own `kube::Client` lifecycle.
    pub fn from_client(client: Client, cluster: LogicalCluster) -> Self {
        Self { client, cluster }
    }

    pub fn cluster(&self) -> &LogicalCluster {
        &self.cluster
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// A cluster-scoped `Api<K>` (e.g. `Edge`, `User`).
    pub fn cluster_scoped<K>(&self) -> Api<K>
    where
        K: Resource<Scope = kube::core::ClusterResourceScope>,
        K::DynamicType: Default,
    {
        Api::all(self.client.clone())
    }

    /// A namespaced `Api<K>` (e.g. `VirtualWorkload`, `Placement`) under
    /// `namespace`.
    pub fn namespaced<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = kube::core::NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    pub async fn get<K>(&self, api: &Api<K>, name: &str) -> Result<K, StoreError>
    where
        K: Clone + DeserializeOwned + std::fmt::Debug,
    {
        api.get(name).await.map_err(StoreError::Backend)
    }

    pub async fn list<K>(&self, api: &Api<K>) -> Result<Vec<K>, StoreError>
    where
        K: Clone + DeserializeOwned + std::fmt::Debug,
    {
        let list = api.list(&ListParams::default()).await.map_err(StoreError::Backend)?;
        Ok(list.items)
    }

    /// A watch stream over `api`, yielding each applied/deleted event. The
    /// scheduler and lifecycle reconcilers (`kedge-scheduler`) fold this
    /// into per-key requeues rather than reacting to events directly.
    pub fn watch<K>(&self, api: &Api<K>) -> impl Stream<Item = Result<Event<K>, StoreError>>
    where
        K: Clone + DeserializeOwned + std::fmt::Debug + Send + 'static,
    {
        watcher::watcher(api.clone(), watcher::Config::default())
            .map(|r| r.map_err(StoreError::Backend))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
