// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manual path-segment routing for the hub's HTTP surface (§6), in the
//! same "dispatch by hand" shape as the teacher's own `Listener` rather
//! than an external router crate.

const AGENT_PROXY_PREFIX: &str = "services/agent-proxy";
const EDGES_PROXY_PREFIX: &str = "services/edges-proxy/clusters";
const EDGE_PATH_INFIX: &[&str] = &["apis", "kedge.faros.sh", "v1alpha1", "edges"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Healthz,
    Readyz,
    AuthAuthorize,
    AuthCallback,
    AuthTokenLogin,
    /// `…/{cluster}/apis/kedge.faros.sh/v1alpha1/edges/{name}/proxy`
    AgentProxyRegister { cluster: String, name: String },
    /// `…/proxy?id=<hex>`
    AgentProxyPickup,
    /// `…/edges/{name}/k8s[/<sub_path>]`; `sub_path` is empty for an
    /// exact `/k8s` hit, matching the "empty -> `/k8s/`" rule in §4.5.
    EdgesProxyK8s { cluster: String, name: String, sub_path: String },
    /// `…/edges/{name}/ssh`
    EdgesProxySsh { cluster: String, name: String },
    NotFound,
}

/// Routes `path` (the request-target's path component, no query string).
/// Pure and total: every input produces exactly one `Route`.
pub fn parse_route(path: &str) -> Route {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["healthz"] => Route::Healthz,
        ["readyz"] => Route::Readyz,
        ["auth", "authorize"] => Route::AuthAuthorize,
        ["auth", "callback"] => Route::AuthCallback,
        ["auth", "token-login"] => Route::AuthTokenLogin,
        _ => parse_services_route(&segments).unwrap_or(Route::NotFound),
    }
}

fn parse_services_route(segments: &[&str]) -> Option<Route> {
    if let Some(rest) = strip_prefix(segments, AGENT_PROXY_PREFIX) {
        return parse_agent_proxy(rest);
    }
    if let Some(rest) = strip_prefix(segments, EDGES_PROXY_PREFIX) {
        return parse_edges_proxy(rest);
    }
    None
}

fn parse_agent_proxy(rest: &[&str]) -> Option<Route> {
    if rest.len() == 1 && rest[0] == "proxy" {
        return Some(Route::AgentProxyPickup);
    }
    let (cluster, name) = edge_identity(rest, "proxy")?;
    Some(Route::AgentProxyRegister { cluster, name })
}

fn parse_edges_proxy(rest: &[&str]) -> Option<Route> {
    // rest = [cluster, "apis", "kedge.faros.sh", "v1alpha1", "edges", name, sub, ...]
    if rest.len() < 6 || rest.get(1..5) != Some(EDGE_PATH_INFIX) {
        return None;
    }
    let cluster = rest[0].to_string();
    let name = rest[5].to_string();
    let remainder = &rest[6..];

    match remainder.split_first() {
        Some((&"k8s", sub)) => Some(Route::EdgesProxyK8s { cluster, name, sub_path: sub.join("/") }),
        Some((&"ssh", [])) => Some(Route::EdgesProxySsh { cluster, name }),
        _ => None,
    }
}

/// `rest = [cluster, "apis", "kedge.faros.sh", "v1alpha1", "edges", name, tail]`,
/// used by the agent-proxy register path where `tail` must equal `tail_match`.
fn edge_identity(rest: &[&str], tail_match: &str) -> Option<(String, String)> {
    if rest.len() != 7 || rest.get(1..5) != Some(EDGE_PATH_INFIX) || rest[6] != tail_match {
        return None;
    }
    Some((rest[0].to_string(), rest[5].to_string()))
}

/// Reads `key`'s value out of `query` (the request-target's query
/// component, no leading `?`). Used for the pickup id and the CLI
/// callback's `p`/`s` parameters, none of which need full form-decoding.
pub fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

fn strip_prefix<'a>(segments: &'a [&'a str], prefix: &str) -> Option<&'a [&'a str]> {
    let prefix_segments: Vec<&str> = prefix.split('/').collect();
    if segments.len() < prefix_segments.len() {
        return None;
    }
    let (head, tail) = segments.split_at(prefix_segments.len());
    if head == prefix_segments.as_slice() {
        Some(tail)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
