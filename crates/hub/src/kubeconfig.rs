// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds the kubeconfig handed back in `LoginResponse` (§6): one
//! cluster/context/user pointing at the object store's front-proxy, scoped
//! to the caller's logical cluster, bearing their own token as a bearer
//! credential. Templated directly — the handful of fields this needs
//! doesn't earn pulling in `kube::config`'s richer multi-cluster model.

const TEMPLATE: &str = "apiVersion: v1\n\
kind: Config\n\
clusters:\n\
- name: kedge\n  \
  cluster:\n    \
    server: {server}\n    \
    insecure-skip-tls-verify: {insecure}\n\
contexts:\n\
- name: kedge\n  \
  context:\n    \
    cluster: kedge\n    \
    user: kedge\n\
current-context: kedge\n\
users:\n\
- name: kedge\n  \
  user:\n    \
    token: {token}\n";

/// Renders the kubeconfig YAML for `logical_cluster` under `cluster_url`
/// (the object store's base API server URL), authenticating as `token`.
pub fn build(cluster_url: &str, logical_cluster: &str, token: &str, dev_mode: bool) -> String {
    let server = format!("{}/clusters/{}", cluster_url.trim_end_matches('/'), logical_cluster);
    TEMPLATE
        .replace("{server}", &quote(&server))
        .replace("{insecure}", if dev_mode { "true" } else { "false" })
        .replace("{token}", &quote(token))
}

/// Double-quotes `value` for embedding in a YAML scalar, escaping the two
/// characters that would otherwise break out of the quotes.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
#[path = "kubeconfig_tests.rs"]
mod tests;
