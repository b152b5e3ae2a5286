// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP Reverse Proxy over Tunnel (C6): two modes on a per-request
//! tunnel-backed connection — a plain request/response round trip, and a
//! hijack-and-copy bridge for protocol-upgrade requests (`Connection:
//! Upgrade`).

use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ProxyError;

/// Non-upgrade mode: performs one request/response exchange over `conn`,
/// a fresh tunnel-backed connection dialed for this request alone. Body
/// streaming is transparent — the returned `Incoming` body is not
/// buffered here.
pub async fn round_trip<C, B>(conn: C, req: Request<B>) -> Result<hyper::Response<Incoming>, ProxyError>
where
    C: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    B: hyper::body::Body + Send + 'static + Unpin,
    B::Data: Send,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let io = TokioIo::new(conn);
    let (mut sender, connection) =
        http1::handshake(io).await.map_err(|e| ProxyError::Http(e.to_string()))?;

    // The connection-driving task outlives this call only long enough to
    // service the single in-flight request; once the response is
    // returned the caller drops `sender` and this task exits on its own.
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!(%e, "tunnel-backed HTTP/1.1 connection ended");
        }
    });

    sender.send_request(req).await.map_err(|e| ProxyError::Http(e.to_string()))
}

/// Rewrites the preserved sub-path after `…/k8s` into the agent-side
/// `/k8s/<sub-path>` form the agent's local reverse proxy expects. An
/// empty sub-path becomes `/k8s/`.
pub fn rewrite_k8s_path(sub_path: &str) -> String {
    if sub_path.is_empty() {
        "/k8s/".to_string()
    } else {
        format!("/k8s/{}", sub_path.trim_start_matches('/'))
    }
}

/// Upgrade mode: writes `raw_request` (the client's original request
/// bytes, verbatim) onto `tunnel`, then bridges `client` and `tunnel`
/// bidirectionally until either side closes or errors. Each side is
/// owned by exactly one request and is the caller's responsibility to
/// close on return.
pub async fn bridge_upgrade<C, T>(client: C, tunnel: T, raw_request: &[u8]) -> Result<(), ProxyError>
where
    C: AsyncRead + AsyncWrite + Unpin,
    T: AsyncRead + AsyncWrite + Unpin,
{
    let (mut client_read, mut client_write) = tokio::io::split(client);
    let (mut tunnel_read, mut tunnel_write) = tokio::io::split(tunnel);

    tunnel_write.write_all(raw_request).await?;

    let client_to_tunnel = tokio::io::copy(&mut client_read, &mut tunnel_write);
    let tunnel_to_client = tokio::io::copy(&mut tunnel_read, &mut client_write);

    // Either direction returning — clean EOF or error — ends the whole
    // exchange; the other copy is dropped rather than waited on.
    tokio::select! {
        result = client_to_tunnel => { result?; }
        result = tunnel_to_client => { result?; }
    }
    Ok(())
}

#[cfg(test)]
#[path = "http_proxy_tests.rs"]
mod tests;
