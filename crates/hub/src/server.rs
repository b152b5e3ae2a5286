// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The hub's HTTP(S) accept loop: binds `--listen-addr`, optionally wraps
//! each accepted connection in TLS, and dispatches every request by
//! [`crate::routing::parse_route`] to the matching §6 handler. Shaped the
//! same "accept connections, hand each to a spawned task" way the
//! codebase's other long-running listeners work, rather than adopting an
//! external web framework (§6 implementation notes).

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;

use crate::handlers::{agent_proxy, auth, edges_proxy, health};
use crate::routing::{parse_route, query_param, Route};
use crate::state::AppState;
use crate::TlsMaterial;

/// Accepts connections on `listen_addr` until `cancel` fires, spawning one
/// task per connection. Once cancelled, stops accepting new connections
/// and waits up to `drain_timeout` for in-flight connections to finish
/// before returning (§5: "graceful HTTP shutdown (<=5s)").
pub async fn serve(
    listen_addr: &str,
    state: Arc<AppState>,
    tls: Option<TlsMaterial>,
    cancel: CancellationToken,
    drain_timeout: std::time::Duration,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = listen_addr, tls = tls.is_some(), "hub listening");

    let acceptor = match tls {
        Some(material) => Some(build_acceptor(material)?),
        None => None,
    };

    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(pair) => pair,
                    Err(err) => {
                        tracing::warn!(%err, "accept failed");
                        continue;
                    }
                };
                let state = Arc::clone(&state);
                let acceptor = acceptor.clone();
                connections.spawn(async move {
                    if let Err(err) = handle_connection(stream, acceptor, state).await {
                        tracing::debug!(%err, %peer, "connection ended with an error");
                    }
                });
            }
        }
    }

    tracing::info!("closing all registered agent tunnels");
    state.registry.close_all();

    tracing::info!(pending = connections.len(), "draining in-flight connections");
    let drained = tokio::time::timeout(drain_timeout, async {
        while connections.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!(remaining = connections.len(), "drain window elapsed with connections still open");
    }
    Ok(())
}

fn build_acceptor(material: TlsMaterial) -> std::io::Result<TlsAcceptor> {
    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(material.certs, material.key)
        .map_err(|e| std::io::Error::other(format!("building TLS server config: {e}")))?;
    Ok(TlsAcceptor::from(Arc::new(config)))
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    acceptor: Option<TlsAcceptor>,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = hyper::service::service_fn(move |req| {
        let state = Arc::clone(&state);
        async move { dispatch(state, req).await }
    });

    match acceptor {
        Some(acceptor) => {
            let tls_stream = acceptor.accept(stream).await?;
            auto::Builder::new(TokioExecutor::new())
                .serve_connection_with_upgrades(TokioIo::new(tls_stream), service)
                .await?;
        }
        None => {
            auto::Builder::new(TokioExecutor::new())
                .serve_connection_with_upgrades(TokioIo::new(stream), service)
                .await?;
        }
    }
    Ok(())
}

/// Routes one request to its §6 handler. Total: every `Route` has a match
/// arm, and every handler returns a `Response` rather than propagating an
/// error, so this never fails.
async fn dispatch(state: Arc<AppState>, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();

    let response = match parse_route(&path) {
        Route::Healthz => health::healthz(),
        Route::Readyz => health::readyz(),
        Route::AuthAuthorize => auth::authorize(state, req).await,
        Route::AuthCallback => auth::callback(state, req).await,
        Route::AuthTokenLogin => auth::token_login(state, req).await,
        Route::AgentProxyRegister { cluster, name } => agent_proxy::register(state, req, cluster, name).await,
        Route::AgentProxyPickup => match query_param(&query, "id") {
            Some(id) => agent_proxy::pickup(state, req, id).await,
            None => crate::error::bad_request("missing pickup id"),
        },
        Route::EdgesProxyK8s { cluster, name, sub_path } => edges_proxy::k8s(state, req, cluster, name, sub_path).await,
        Route::EdgesProxySsh { cluster, name } => edges_proxy::ssh(state, req, cluster, name).await,
        Route::NotFound => crate::error::not_found("no such route"),
    };

    Ok(response)
}
