// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Agent-Proxy Handler (C3): the register sub-endpoint authenticates
//! an agent, upgrades to WebSocket, builds a Mux over it, stores it in
//! the Connection Registry, and on close best-effort patches the Edge to
//! `Disconnected`; the pickup sub-endpoint hands a back-dialed WebSocket
//! to the waiting `Dial`, with no authorization of its own — the 128-bit
//! id is the capability (§4.3).

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::Request;
use hyper::Response;

use kedge_auth::classify;
use kedge_core::{Edge, EdgePhase, ErrorClass, LogicalCluster, TokenClass};
use kedge_tunnel::{BoxConn, DialerHandle, Mux, WsConn};
use kedge_wire::PickupId;

use crate::error;
use crate::state::AppState;
use crate::ws_upgrade;

/// `…/{cluster}/apis/kedge.faros.sh/v1alpha1/edges/{name}/proxy` (§6):
/// initial agent registration.
pub async fn register(
    state: Arc<AppState>,
    mut req: Request<Incoming>,
    cluster: String,
    name: String,
) -> Response<Full<Bytes>> {
    let Some(token) = crate::bearer::extract_bearer(req.headers()).map(str::to_string) else {
        return error::auth_missing("missing bearer token");
    };

    let class = classify(&token, &state.static_tokens, state.oidc.as_ref());
    if let Err(resp) = authorize_registration(&state, &token, &class, &cluster, &name).await {
        return resp;
    }

    let handshake = match ws_upgrade::handshake_response(&req) {
        Ok(resp) => resp,
        Err(resp) => return resp,
    };

    let state = state.clone();
    tokio::spawn(async move {
        match hyper::upgrade::on(&mut req).await {
            Ok(upgraded) => run_agent_tunnel(state, upgraded, cluster, name).await,
            Err(err) => tracing::warn!(%err, cluster, edge = name, "agent websocket upgrade failed"),
        }
    });

    handshake
}

/// What [`authorize_registration`] should do with a classified token,
/// split out as a pure function of `(class, cluster)` so the fixed
/// registration policy (§4.3 step 2) is testable without a live
/// `Authorizer`.
enum RegistrationPolicy {
    Allow,
    RequireSubjectAccessReview,
    Deny(ErrorClass, &'static str),
}

fn registration_policy(class: &TokenClass, cluster: &str) -> RegistrationPolicy {
    match class {
        TokenClass::Static => RegistrationPolicy::Allow,
        TokenClass::ServiceAccount(claims) => {
            if claims.cluster_name != cluster {
                RegistrationPolicy::Deny(ErrorClass::AuthMissing, "service-account token is not scoped to this cluster")
            } else {
                RegistrationPolicy::RequireSubjectAccessReview
            }
        }
        TokenClass::Oidc(_) => {
            RegistrationPolicy::Deny(ErrorClass::AuthDenied, "OIDC identities may not register an agent tunnel")
        }
        TokenClass::Invalid => {
            RegistrationPolicy::Deny(ErrorClass::AuthMissing, "token did not classify as static or service-account")
        }
    }
}

async fn authorize_registration(
    state: &AppState,
    token: &str,
    class: &TokenClass,
    cluster: &str,
    name: &str,
) -> Result<(), Response<Full<Bytes>>> {
    match registration_policy(class, cluster) {
        RegistrationPolicy::Allow => Ok(()),
        RegistrationPolicy::Deny(class, message) => Err(error::envelope(class, message)),
        RegistrationPolicy::RequireSubjectAccessReview => state
            .authorizer
            .authorize(token, cluster, "get", "edges", name)
            .await
            .map(|_| ())
            .map_err(Into::into),
    }
}

/// Drives one registered agent tunnel end to end: accept the WebSocket,
/// build the Mux, register it, block on `Done`, then deregister and
/// best-effort patch the Edge (§4.3 step 6).
async fn run_agent_tunnel(
    state: Arc<AppState>,
    upgraded: hyper::upgrade::Upgraded,
    cluster: String,
    name: String,
) {
    let ws = ws_upgrade::accept_stream(upgraded).await;
    let (mux, control_task) = Mux::spawn(ws, state.pickups.clone());
    let mux = Arc::new(mux);
    let key = format!("edges/{cluster}/{name}");

    state.registry.store(key.clone(), mux.clone() as Arc<dyn DialerHandle>);
    tracing::info!(cluster = %cluster, edge = %name, "agent tunnel registered");

    // Either the transport fails on its own, or the hub is shutting down
    // and every live tunnel must be torn down within the drain window
    // (§5). `close()` is idempotent, so racing with a concurrent
    // transport failure is harmless.
    tokio::select! {
        () = mux.closed() => {}
        () = state.shutdown.cancelled() => mux.close(),
    }
    state.registry.delete(&key);
    control_task.abort();

    if let Err(err) = mark_disconnected(&state, &cluster, &name).await {
        tracing::warn!(%err, cluster = %cluster, edge = %name, "failed to patch edge status to disconnected");
    }
}

async fn mark_disconnected(
    state: &AppState,
    cluster: &str,
    name: &str,
) -> Result<(), kedge_store::StoreError> {
    let store = state.store_for_cluster(LogicalCluster::new(cluster.to_string()))?;
    let edges_api: kube::Api<Edge> = store.cluster_scoped();
    kedge_store::update_status_with_retry(&edges_api, name, |edge: &Edge| {
        let mut status = edge.status.clone().unwrap_or_default();
        status.connected = false;
        status.phase = EdgePhase::Disconnected;
        status
    })
    .await?;
    Ok(())
}

/// `…/proxy?id=<hex>` (§6): pickup for a C1 back-dial. No authorization —
/// the id itself is the capability.
pub async fn pickup(state: Arc<AppState>, mut req: Request<Incoming>, pickup_id_hex: &str) -> Response<Full<Bytes>> {
    let Some(id) = PickupId::from_hex(pickup_id_hex) else {
        return error::bad_request("malformed pickup id");
    };

    let handshake = match ws_upgrade::handshake_response(&req) {
        Ok(resp) => resp,
        Err(resp) => return resp,
    };

    let pickups = state.pickups.clone();
    tokio::spawn(async move {
        match hyper::upgrade::on(&mut req).await {
            Ok(upgraded) => {
                let ws = ws_upgrade::accept_stream(upgraded).await;
                let conn: BoxConn = Box::new(WsConn::new(ws));
                if !pickups.complete(id, conn) {
                    tracing::debug!("pickup connection arrived with no waiting dial");
                }
            }
            Err(err) => tracing::warn!(%err, "pickup websocket upgrade failed"),
        }
    });

    handshake
}

#[cfg(test)]
#[path = "agent_proxy_tests.rs"]
mod tests;
