// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server-side WebSocket upgrade over a `hyper` 1.x connection, used by
//! every WS entry point in §6 (agent register, agent-proxy pickup, the
//! SSH bridge). Mirrors the documented `hyper` + `tokio-tungstenite`
//! integration: accept the handshake by hand (there is no framework
//! router in this codebase to do it for us), reply `101`, then drive the
//! actual `WebSocketStream` off `hyper::upgrade::on`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONNECTION, UPGRADE};
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio_tungstenite::tungstenite::handshake::derive_accept_key;
use tokio_tungstenite::tungstenite::protocol::Role;
use tokio_tungstenite::WebSocketStream;

use crate::error::bad_request;

fn has_token<B>(req: &Request<B>, name: hyper::header::HeaderName, token: &str) -> bool {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|part| part.trim().eq_ignore_ascii_case(token)))
}

/// `true` iff `req` carries the standard `Connection: Upgrade` /
/// `Upgrade: websocket` pair.
pub fn is_websocket_upgrade<B>(req: &Request<B>) -> bool {
    has_token(req, CONNECTION, "upgrade") && has_token(req, UPGRADE, "websocket")
}

/// `true` iff `req` carries `Connection: Upgrade` with *any* `Upgrade`
/// value — the edges-proxy k8s route hijacks these regardless of protocol
/// (the agent's kube-apiserver may ask for `websocket` or `SPDY/3.1`),
/// unlike [`is_websocket_upgrade`] which the hub's own WS entry points
/// require exactly.
pub fn is_upgrade_request<B>(req: &Request<B>) -> bool {
    has_token(req, CONNECTION, "upgrade") && req.headers().contains_key(UPGRADE)
}

/// Validates the handshake headers and returns the `101` response to send
/// back immediately. The caller must still await `hyper::upgrade::on(&mut
/// req)` (after returning this response) to obtain the raw connection and
/// wrap it with [`accept_stream`].
pub fn handshake_response<B>(req: &Request<B>) -> Result<Response<Full<Bytes>>, Response<Full<Bytes>>> {
    if !is_websocket_upgrade(req) {
        return Err(bad_request("expected a WebSocket upgrade request"));
    }
    let key = req
        .headers()
        .get("Sec-WebSocket-Key")
        .ok_or_else(|| bad_request("missing Sec-WebSocket-Key"))?;
    let accept_key = derive_accept_key(key.as_bytes());

    Response::builder()
        .status(StatusCode::SWITCHING_PROTOCOLS)
        .header(CONNECTION, HeaderValue::from_static("Upgrade"))
        .header(UPGRADE, HeaderValue::from_static("websocket"))
        .header("Sec-WebSocket-Accept", accept_key)
        .body(Full::new(Bytes::new()))
        .map_err(|e| bad_request(format!("building handshake response: {e}")))
}

/// Wraps an already-upgraded connection (from `hyper::upgrade::on`) as a
/// server-role `WebSocketStream`, ready for the agent-proxy/SSH-bridge
/// code above it.
pub async fn accept_stream(
    upgraded: hyper::upgrade::Upgraded,
) -> WebSocketStream<TokioIo<hyper::upgrade::Upgraded>> {
    WebSocketStream::from_raw_socket(TokioIo::new(upgraded), Role::Server, None).await
}

#[cfg(test)]
#[path = "ws_upgrade_tests.rs"]
mod tests;
