// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Edge` resource — a remote target the hub manages: either a
//! Kubernetes cluster (`type: kubernetes`) or an SSH-reachable host
//! (`type: server`).
//!
//! # Invariants (enforced by callers, not by serde)
//!
//! - `connected == true` iff `phase == Ready`.
//! - `type` is immutable after the first successful transition into `Ready`.
//! - When the tunnel backing an edge drops, `connected` must become `false`
//!   within the heartbeat timeout ([`crate::heartbeat`]).

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Discriminates how the hub reaches an edge once its tunnel is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    Kubernetes,
    Server,
}

crate::simple_display! {
    EdgeType {
        Kubernetes => "kubernetes",
        Server => "server",
    }
}

/// Lifecycle phase of an edge, driven by [`crate::heartbeat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum EdgePhase {
    #[default]
    Scheduling,
    Ready,
    Disconnected,
}

crate::simple_display! {
    EdgePhase {
        Scheduling => "Scheduling",
        Ready => "Ready",
        Disconnected => "Disconnected",
    }
}

/// SSH credentials recorded on a `server`-type edge's status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SshCredentials {
    pub username: Option<String>,
    /// Name of a Secret in the edge's namespace holding the password.
    pub password_secret_ref: Option<String>,
    /// Name of a Secret in the edge's namespace holding a private key.
    pub private_key_secret_ref: Option<String>,
}

#[derive(Debug, Clone, CustomResource, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "kedge.faros.sh",
    version = "v1alpha1",
    kind = "Edge",
    plural = "edges",
    status = "EdgeStatus",
    derive = "Default"
)]
pub struct EdgeSpec {
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// SSH port for `server` edges. Defaults to 22.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    /// Secret reference holding a private key used to *reach* the edge
    /// (distinct from `status.sshCredentials`, which records what the agent
    /// reported about its own sshd).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_secret_ref: Option<String>,
}

impl EdgeSpec {
    pub fn ssh_port(&self) -> u16 {
        self.ssh_port.unwrap_or(22)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EdgeStatus {
    pub phase: EdgePhase,
    #[serde(default)]
    pub connected: bool,
    /// External URL users reach this edge's `k8s` proxy through (mount
    /// reconciler output; `kubernetes` edges only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_credentials: Option<SshCredentials>,
    /// RFC 3339 timestamp of the last heartbeat the agent posted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_time: Option<String>,
}

impl Edge {
    /// `true` once the edge has ever reached `Ready` with the given type —
    /// used to enforce the "type is immutable after first Ready" invariant
    /// at the admission/reconcile boundary.
    pub fn type_locked(&self) -> bool {
        matches!(self.status.as_ref().map(|s| s.phase), Some(EdgePhase::Ready))
    }
}

#[cfg(test)]
#[path = "edge_tests.rs"]
mod tests;
