// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Edges-Proxy Handler (C5): authenticates+authorizes a caller against
//! one edge, looks it up in the Connection Registry, and dispatches to the
//! HTTP Reverse Proxy over Tunnel (C6) for `/k8s[/…]` or the SSH Bridge
//! (C7) for `/ssh[?cmd=…]` (§4.5, §4.6, §4.7).

use std::sync::Arc;

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Incoming;
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use kube::api::Api;
use tokio_tungstenite::tungstenite::Message;

use kedge_auth::classify;
use kedge_core::{subject_label_value, Edge, ErrorClass, LogicalCluster, OidcClaims, TokenClass, User, SUBJECT_LABEL};
use kedge_proxy::ProxyError;
use kedge_store::{ObjectStore, StoreError};
use kedge_tunnel::{DialerHandle, MIN_DIAL_TIMEOUT};

use crate::error;
use crate::routing::query_param;
use crate::state::AppState;
use crate::ws_upgrade;

/// `…/edges/{name}/k8s[/<sub_path>]` (§6): reverse proxy to the agent's
/// local kube-apiserver, transparently hijacking protocol-upgrade requests.
pub async fn k8s(
    state: Arc<AppState>,
    mut req: Request<Incoming>,
    cluster: String,
    name: String,
    sub_path: String,
) -> Response<Full<Bytes>> {
    if let Err(resp) = authenticate(&state, &req, &cluster, &name).await {
        return resp;
    }

    let Some(dialer) = state.registry.load(&format!("edges/{cluster}/{name}")) else {
        return error::tunnel_missing(&cluster, &name);
    };

    if ws_upgrade::is_upgrade_request(&req) {
        proxy_k8s_upgrade(dialer, &mut req, &sub_path).await
    } else {
        proxy_k8s_round_trip(dialer, req, &sub_path).await
    }
}

/// `…/edges/{name}/ssh[?cmd=…]` (§6): an interactive PTY session, or a
/// single command exec when `?cmd=` is present.
pub async fn ssh(
    state: Arc<AppState>,
    mut req: Request<Incoming>,
    cluster: String,
    name: String,
) -> Response<Full<Bytes>> {
    let class = match authenticate(&state, &req, &cluster, &name).await {
        Ok(class) => class,
        Err(resp) => return resp,
    };

    let Some(edge) = lookup_edge(&state, &cluster, &name).await else {
        return error::not_found("edge record not found");
    };

    let Some(dialer) = state.registry.load(&format!("edges/{cluster}/{name}")) else {
        return error::tunnel_missing(&cluster, &name);
    };

    let handshake = match ws_upgrade::handshake_response(&req) {
        Ok(resp) => resp,
        Err(resp) => return resp,
    };

    let query = req.uri().query().unwrap_or("").to_string();
    let cmd = query_param(&query, "cmd").map(str::to_string);
    let (oidc_email, oidc_sub) = oidc_identity(&class);

    let state = state.clone();
    let log_cluster = cluster.clone();
    let log_name = name.clone();
    tokio::spawn(async move {
        match hyper::upgrade::on(&mut req).await {
            Ok(upgraded) => run_ssh_session(state, upgraded, dialer, edge, cmd, oidc_email, oidc_sub).await,
            Err(err) => tracing::warn!(%err, cluster = log_cluster, edge = log_name, "ssh websocket upgrade failed"),
        }
    });

    handshake
}

/// What [`authorize_proxy`] should do with a classified token, split out
/// as a pure function so the §4.5/§4.7 step-1 decision is testable
/// without a live `Authorizer` or object store.
enum ProxyPolicy {
    Allow,
    RequireSubjectAccessReview,
    RequireOidcClusterMatch,
    Deny(ErrorClass, &'static str),
}

fn proxy_policy(class: &TokenClass) -> ProxyPolicy {
    match class {
        TokenClass::Static => ProxyPolicy::Allow,
        TokenClass::ServiceAccount(_) => ProxyPolicy::RequireSubjectAccessReview,
        TokenClass::Oidc(_) => ProxyPolicy::RequireOidcClusterMatch,
        TokenClass::Invalid => {
            ProxyPolicy::Deny(ErrorClass::AuthMissing, "token did not classify as static, service-account, or OIDC")
        }
    }
}

async fn authenticate(
    state: &AppState,
    req: &Request<Incoming>,
    cluster: &str,
    name: &str,
) -> Result<TokenClass, Response<Full<Bytes>>> {
    let Some(token) = crate::bearer::extract_bearer(req.headers()) else {
        return Err(error::auth_missing("missing bearer token"));
    };
    let class = classify(token, &state.static_tokens, state.oidc.as_ref());
    authorize_proxy(state, token, &class, cluster, name).await?;
    Ok(class)
}

async fn authorize_proxy(
    state: &AppState,
    token: &str,
    class: &TokenClass,
    cluster: &str,
    name: &str,
) -> Result<(), Response<Full<Bytes>>> {
    match proxy_policy(class) {
        ProxyPolicy::Allow => Ok(()),
        ProxyPolicy::Deny(class, message) => Err(error::envelope(class, message)),
        ProxyPolicy::RequireSubjectAccessReview => {
            state.authorizer.authorize(token, cluster, "proxy", "edges", name).await.map(|_| ()).map_err(Into::into)
        }
        ProxyPolicy::RequireOidcClusterMatch => {
            let TokenClass::Oidc(claims) = class else {
                unreachable!("proxy_policy only returns RequireOidcClusterMatch for TokenClass::Oidc")
            };
            match oidc_default_cluster(state, claims).await {
                Ok(Some(default_cluster)) if default_cluster == cluster => Ok(()),
                Ok(Some(_)) => {
                    Err(error::envelope(ErrorClass::AuthDenied, "this identity is not granted the requested logical cluster"))
                }
                Ok(None) => Err(error::envelope(ErrorClass::AuthDenied, "no User record for this identity")),
                Err(err) => Err(err.into()),
            }
        }
    }
}

/// Resolves an OIDC identity's granted `defaultCluster` by its derived
/// subject label, performed instead of a SubjectAccessReview for this
/// path — a known gap recorded in `DESIGN.md`.
async fn oidc_default_cluster(state: &AppState, claims: &OidcClaims) -> Result<Option<String>, StoreError> {
    let label = subject_label_value(&claims.issuer, &claims.subject);
    let users: Api<User> = state.system_store.cluster_scoped();
    let existing = state.system_store.list(&users).await?;
    Ok(existing
        .into_iter()
        .find(|u| u.metadata.labels.as_ref().and_then(|l| l.get(SUBJECT_LABEL)).map(String::as_str) == Some(label.as_str()))
        .map(|u| u.spec.default_cluster))
}

fn oidc_identity(class: &TokenClass) -> (Option<String>, Option<String>) {
    match class {
        TokenClass::Oidc(claims) => (claims.email.clone(), Some(claims.subject.clone())),
        _ => (None, None),
    }
}

async fn lookup_edge(state: &AppState, cluster: &str, name: &str) -> Option<Edge> {
    let store = state.store_for_cluster(LogicalCluster::new(cluster.to_string())).ok()?;
    let edges: Api<Edge> = store.cluster_scoped();
    store.get(&edges, name).await.ok()
}

/// Rebuilds the agent-bound request: rewrites the path to `/k8s/<sub>`,
/// preserves method/query/headers (minus hop-by-hop ones the proxied
/// connection owns itself), and substitutes `body`.
fn build_upstream_request<B>(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    sub_path: &str,
    body: B,
) -> Result<Request<B>, ProxyError> {
    let path = kedge_proxy::rewrite_k8s_path(sub_path);
    let target = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let mut builder = Request::builder().method(method.clone()).uri(target);
    for (name, value) in headers.iter() {
        if is_hop_by_hop(name) {
            continue;
        }
        builder = builder.header(name.clone(), value.clone());
    }
    builder.body(body).map_err(|e| ProxyError::Http(e.to_string()))
}

fn is_hop_by_hop(name: &hyper::header::HeaderName) -> bool {
    matches!(name.as_str(), "proxy-connection" | "keep-alive" | "te" | "trailers")
}

/// Non-upgrade mode: one request/response round trip. The response body is
/// buffered into `Full<Bytes>` so every hub handler shares one response
/// type; long-lived streaming responses (e.g. `watch=true` lists) are a
/// known limitation of this simplification, recorded in `DESIGN.md`.
async fn proxy_k8s_round_trip(dialer: Arc<dyn DialerHandle>, req: Request<Incoming>, sub_path: &str) -> Response<Full<Bytes>> {
    let conn = match dialer.dial(MIN_DIAL_TIMEOUT).await {
        Ok(conn) => conn,
        Err(err) => return ProxyError::from(err).into(),
    };

    let (parts, body) = req.into_parts();
    let outbound = match build_upstream_request(&parts.method, &parts.uri, &parts.headers, sub_path, body) {
        Ok(outbound) => outbound,
        Err(err) => return err.into(),
    };

    let upstream_resp = match kedge_proxy::round_trip(conn, outbound).await {
        Ok(resp) => resp,
        Err(err) => return err.into(),
    };

    buffer_response(upstream_resp).await
}

/// Upgrade mode: round-trips the agent's upgrade response the way an
/// ordinary `hyper` reverse proxy mirrors a `101` back to its own caller —
/// send our own `101` first, then bridge the two upgraded halves.
async fn proxy_k8s_upgrade(dialer: Arc<dyn DialerHandle>, req: &mut Request<Incoming>, sub_path: &str) -> Response<Full<Bytes>> {
    let conn = match dialer.dial(MIN_DIAL_TIMEOUT).await {
        Ok(conn) => conn,
        Err(err) => return ProxyError::from(err).into(),
    };

    let outbound = match build_upstream_request(req.method(), req.uri(), req.headers(), sub_path, Empty::<Bytes>::new()) {
        Ok(outbound) => outbound,
        Err(err) => return err.into(),
    };

    let upstream_resp = match kedge_proxy::round_trip(conn, outbound).await {
        Ok(resp) => resp,
        Err(err) => return err.into(),
    };

    if upstream_resp.status() != StatusCode::SWITCHING_PROTOCOLS {
        return buffer_response(upstream_resp).await;
    }

    let mut client_resp_builder = Response::builder().status(StatusCode::SWITCHING_PROTOCOLS);
    if let Some(headers) = client_resp_builder.headers_mut() {
        for (name, value) in upstream_resp.headers().iter() {
            headers.insert(name, value.clone());
        }
    }
    let client_resp = match client_resp_builder.body(Full::new(Bytes::new())) {
        Ok(resp) => resp,
        Err(_) => return error::bad_request("failed to build upgrade response"),
    };

    // Must be taken before this function returns its response, since the
    // caller's `&mut Request` does not outlive this call.
    let client_upgrade = hyper::upgrade::on(req);
    tokio::spawn(async move {
        match futures_util::future::try_join(client_upgrade, hyper::upgrade::on(upstream_resp)).await {
            Ok((client_upgraded, tunnel_upgraded)) => {
                let client_io = hyper_util::rt::TokioIo::new(client_upgraded);
                let tunnel_io = hyper_util::rt::TokioIo::new(tunnel_upgraded);
                if let Err(err) = kedge_proxy::bridge_upgrade(client_io, tunnel_io, b"").await {
                    tracing::debug!(%err, "k8s upgrade bridge ended");
                }
            }
            Err(err) => tracing::warn!(%err, "k8s upgrade handshake failed"),
        }
    });

    client_resp
}

async fn buffer_response(resp: Response<Incoming>) -> Response<Full<Bytes>> {
    let (parts, body) = resp.into_parts();
    match body.collect().await {
        Ok(collected) => Response::from_parts(parts, Full::new(collected.to_bytes())),
        Err(err) => error::envelope(ErrorClass::UpstreamIo, format!("reading agent response body: {err}")),
    }
}

async fn resolve_ssh_auth(
    store: &ObjectStore,
    namespace: &str,
    creds: &Option<kedge_core::SshCredentials>,
) -> kedge_proxy::SshAuth {
    let Some(creds) = creds else {
        return kedge_proxy::SshAuth::None;
    };
    if let Some(secret_name) = &creds.private_key_secret_ref {
        if let Ok(pem) = read_secret_field(store, namespace, secret_name, "privateKey").await {
            return kedge_proxy::SshAuth::PrivateKeyPem(pem);
        }
    }
    if let Some(secret_name) = &creds.password_secret_ref {
        if let Ok(password) = read_secret_field(store, namespace, secret_name, "password").await {
            return kedge_proxy::SshAuth::Password(password);
        }
    }
    kedge_proxy::SshAuth::None
}

async fn read_secret_field(store: &ObjectStore, namespace: &str, name: &str, field: &str) -> Result<String, StoreError> {
    let secrets: Api<k8s_openapi::api::core::v1::Secret> = store.namespaced(namespace);
    let secret = store.get(&secrets, name).await?;
    secret
        .data
        .and_then(|mut data| data.remove(field))
        .map(|bytes| String::from_utf8_lossy(&bytes.0).into_owned())
        .ok_or(StoreError::NotFound)
}

/// Drives one SSH bridge session end to end, after the caller's WebSocket
/// upgrade has completed: dials a fresh tunnel conn, runs the `/ssh`
/// agent-side handshake, authenticates, then either execs `cmd` once or
/// bridges an interactive PTY to the caller (§4.7).
#[allow(clippy::too_many_arguments)]
async fn run_ssh_session(
    state: Arc<AppState>,
    upgraded: hyper::upgrade::Upgraded,
    dialer: Arc<dyn DialerHandle>,
    edge: Edge,
    cmd: Option<String>,
    oidc_email: Option<String>,
    oidc_sub: Option<String>,
) {
    let ws = ws_upgrade::accept_stream(upgraded).await;
    let (mut ws_write, mut ws_read) = ws.split();

    let conn = match dialer.dial(MIN_DIAL_TIMEOUT).await {
        Ok(conn) => conn,
        Err(err) => {
            tracing::warn!(%err, "ssh tunnel dial failed");
            let _ = ws_write.close().await;
            return;
        }
    };

    let handshake_conn = match kedge_proxy::upgrade(conn).await {
        Ok(conn) => conn,
        Err(err) => {
            tracing::warn!(%err, "ssh handshake with agent failed");
            let _ = ws_write.close().await;
            return;
        }
    };

    let creds = edge.status.as_ref().and_then(|s| s.ssh_credentials.clone());
    let auth = resolve_ssh_auth(&state.system_store, &state.workload_namespace, &creds).await;
    let username =
        kedge_proxy::select_username(creds.as_ref().and_then(|c| c.username.as_deref()), oidc_email.as_deref(), oidc_sub.as_deref());

    let handle = match kedge_proxy::connect(handshake_conn, &username, auth).await {
        Ok(handle) => handle,
        Err(err) => {
            tracing::warn!(%err, "ssh authentication failed");
            let _ = ws_write.close().await;
            return;
        }
    };

    if let Some(command) = cmd {
        match kedge_proxy::exec_command(&handle, &command).await {
            Ok(output) => {
                let _ = ws_write.send(Message::Binary(output)).await;
            }
            Err(err) => tracing::warn!(%err, "ssh exec failed"),
        }
        let _ = ws_write.close().await;
        return;
    }

    let channel = match kedge_proxy::open_pty_session(&handle, 80, 24).await {
        Ok(channel) => channel,
        Err(err) => {
            tracing::warn!(%err, "opening pty failed");
            let _ = ws_write.close().await;
            return;
        }
    };

    let (control_tx, control_rx) = tokio::sync::mpsc::channel(32);
    let (output_tx, mut output_rx) = tokio::sync::mpsc::channel(32);
    let drive = tokio::spawn(kedge_proxy::drive_pty_session(channel, control_rx, output_tx));

    loop {
        tokio::select! {
            msg = ws_read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match kedge_proxy::decode_client_frame(&text) {
                        Ok(action) => {
                            if control_tx.send(action).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => tracing::debug!(%err, "malformed ssh control frame"),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!(%err, "ssh websocket read error");
                        break;
                    }
                }
            }
            chunk = output_rx.recv() => {
                match chunk {
                    Some(data) => {
                        if ws_write.send(Message::Binary(data)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    drop(control_tx);
    drive.abort();
    let _ = ws_write.close().await;
}

#[cfg(test)]
#[path = "edges_proxy_tests.rs"]
mod tests;
