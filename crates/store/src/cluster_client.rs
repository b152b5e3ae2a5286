// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scopes a base `kube::Client` to a logical cluster by rewriting the
//! configured API server URL to carry the cluster's `/clusters/{path}`
//! prefix, the way every kcp-aware client does. The object store itself
//! (kcp) is an external collaborator (§1 Non-goals); this module only
//! carries the path string through `kube::Client` construction.

use kube::{Client, Config};

use kedge_core::LogicalCluster;

use crate::error::StoreError;

/// Builds a `Client` scoped to `cluster`, reusing everything else
/// (auth, TLS, timeouts) from `base`.
pub fn scoped_client(base: &Config, cluster: &LogicalCluster) -> Result<Client, StoreError> {
    let mut config = base.clone();
    let scoped_url = join_cluster_path(&config.cluster_url.to_string(), cluster.as_str())
        .map_err(StoreError::InvalidCluster)?;
    config.cluster_url = scoped_url
        .parse()
        .map_err(|e| StoreError::InvalidCluster(format!("{scoped_url}: {e}")))?;
    Client::try_from(config).map_err(StoreError::Backend)
}

fn join_cluster_path(base: &str, cluster: &str) -> Result<String, String> {
    if cluster.is_empty() {
        return Err("logical cluster path must not be empty".to_string());
    }
    let base = base.trim_end_matches('/');
    Ok(format!("{base}/clusters/{cluster}"))
}

#[cfg(test)]
#[path = "cluster_client_tests.rs"]
mod tests;
