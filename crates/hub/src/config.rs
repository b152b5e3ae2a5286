// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hub CLI flags (`clap`) plus centralized environment-variable access,
//! mirroring the daemon's own `env.rs` convention of small typed
//! accessor functions rather than scattering `std::env::var` calls.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// `kedge-hub` — the multi-tenant reverse-tunnel control plane.
#[derive(Debug, Parser)]
#[command(name = "kedge-hub", author, version, about = "Kedge hub: reverse-tunnel connectivity fabric")]
pub struct Args {
    /// Address the HTTP(S) server binds to.
    #[arg(long, env = "KEDGE_LISTEN_ADDR", default_value = "0.0.0.0:8443")]
    pub listen_addr: String,

    /// Directory for any on-disk state the hub itself keeps (not the
    /// object store, which lives externally).
    #[arg(long, env = "KEDGE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Kubeconfig used for per-request, per-cluster object-store access
    /// (TokenReview/SubjectAccessReview and the kcp-scoped client base).
    #[arg(long, env = "KEDGE_KUBECONFIG")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig used by the scheduler/aggregator/lifecycle/mount
    /// reconcilers, which run against the hub's own administrative
    /// workspace rather than a per-request logical cluster. Falls back to
    /// `--kubeconfig` when unset.
    #[arg(long, env = "KEDGE_EXTERNAL_KCP_KUBECONFIG")]
    pub external_kcp_kubeconfig: Option<PathBuf>,

    /// TLS certificate; when unset alongside `--serving-key-file` the
    /// hub serves plain HTTP (`--dev-mode` only).
    #[arg(long, env = "KEDGE_SERVING_CERT_FILE")]
    pub serving_cert_file: Option<PathBuf>,

    #[arg(long, env = "KEDGE_SERVING_KEY_FILE")]
    pub serving_key_file: Option<PathBuf>,

    /// Base external URL users reach this hub at, used to build the
    /// mount reconciler's deterministic `status.url` (§4.10).
    #[arg(long, env = "KEDGE_EXTERNAL_URL")]
    pub external_url: String,

    #[arg(long, env = "KEDGE_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,

    /// Permits TLS verification skip on the OIDC provider and upstream
    /// kube backend. Never the default.
    #[arg(long, env = "KEDGE_DEV_MODE", default_value_t = false)]
    pub dev_mode: bool,

    /// Namespace the scheduler/aggregator reconcile `VirtualWorkload` and
    /// `Placement` objects in.
    #[arg(long, env = "KEDGE_WORKLOAD_NAMESPACE", default_value = "default")]
    pub workload_namespace: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Comma-separated static-token allow-list (§4.4 "Static" class).
pub fn static_tokens() -> kedge_auth::StaticTokenStore {
    std::env::var("KEDGE_STATIC_TOKENS")
        .ok()
        .map(|v| kedge_auth::StaticTokenStore::from_env_value(&v))
        .unwrap_or_default()
}

pub fn oidc_issuer_url() -> Option<String> {
    std::env::var("KEDGE_OIDC_ISSUER_URL").ok().filter(|s| !s.is_empty())
}

pub fn oidc_client_id() -> Option<String> {
    std::env::var("KEDGE_OIDC_CLIENT_ID").ok().filter(|s| !s.is_empty())
}

pub fn oidc_client_secret() -> Option<String> {
    std::env::var("KEDGE_OIDC_CLIENT_SECRET").ok().filter(|s| !s.is_empty())
}

/// Graceful-shutdown drain window (§5: "≤5s"), overridable the same way
/// the daemon's `OJ_DRAIN_TIMEOUT_MS` is.
pub fn drain_timeout() -> Duration {
    std::env::var("KEDGE_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
