// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logical cluster addressing.
//!
//! Every request into the hub names a logical cluster via a `/clusters/{path}`
//! URL segment. The object store itself (kcp) is an external collaborator;
//! this module only carries the path string through the hub's own code so
//! `kube::Api` construction and registry keys stay consistent.

use std::fmt;

/// A logical cluster path, e.g. `root:kedge:users:alice`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct LogicalCluster(String);

impl LogicalCluster {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LogicalCluster {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LogicalCluster {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for LogicalCluster {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
