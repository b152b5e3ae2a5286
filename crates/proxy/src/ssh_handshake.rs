// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent-side `/ssh` upgrade handshake (§4.7 step 2): write a plain
//! HTTP/1.1 upgrade request onto a fresh tunnel-backed connection, read
//! until the end of the response headers, confirm `101`, and hand back a
//! stream that replays whatever bytes were read past the header
//! terminator before the caller sees anything else — the agent is free
//! to start writing SSH protocol bytes immediately after its 101
//! response, and those bytes must not be lost.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::error::ProxyError;

const REQUEST: &[u8] = b"GET /ssh HTTP/1.1\r\nUpgrade: ssh-tunnel\r\nConnection: Upgrade\r\n\r\n";
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const MAX_HEADER_BYTES: usize = 8192;

/// Wraps `inner`, replaying `prebuffered` bytes before reading any more
/// from the underlying connection.
pub struct PrebufferedConn<S> {
    inner: S,
    prebuffered: Vec<u8>,
    prebuffered_pos: usize,
}

impl<S> PrebufferedConn<S> {
    fn new(inner: S, prebuffered: Vec<u8>) -> Self {
        Self { inner, prebuffered, prebuffered_pos: 0 }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for PrebufferedConn<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        if this.prebuffered_pos < this.prebuffered.len() {
            let remaining = &this.prebuffered[this.prebuffered_pos..];
            let n = std::cmp::min(buf.remaining(), remaining.len());
            buf.put_slice(&remaining[..n]);
            this.prebuffered_pos += n;
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for PrebufferedConn<S> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }
    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }
    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Performs the handshake over `conn` and returns a stream ready for SSH
/// protocol bytes.
pub async fn upgrade<S>(mut conn: S) -> Result<PrebufferedConn<S>, ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    conn.write_all(REQUEST).await?;

    let mut header_buf = Vec::with_capacity(256);
    let mut chunk = [0u8; 256];
    let header_end = loop {
        let n = conn.read(&mut chunk).await?;
        if n == 0 {
            return Err(ProxyError::SshHandshake("agent closed connection during handshake".into()));
        }
        header_buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_terminator(&header_buf) {
            break pos + HEADER_TERMINATOR.len();
        }
        if header_buf.len() > MAX_HEADER_BYTES {
            return Err(ProxyError::SshHandshake("response headers exceeded size limit".into()));
        }
    };

    let (headers, prebuffered) = header_buf.split_at(header_end);
    check_switching_protocols(headers)?;

    Ok(PrebufferedConn::new(conn, prebuffered.to_vec()))
}

fn find_header_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(HEADER_TERMINATOR.len()).position(|w| w == HEADER_TERMINATOR)
}

fn check_switching_protocols(headers: &[u8]) -> Result<(), ProxyError> {
    let status_line = headers
        .split(|&b| b == b'\n')
        .next()
        .ok_or_else(|| ProxyError::SshHandshake("empty response".into()))?;
    let status_line = String::from_utf8_lossy(status_line);
    if status_line.contains("101") {
        Ok(())
    } else {
        Err(ProxyError::SshHandshake(format!("expected 101 Switching Protocols, got: {}", status_line.trim())))
    }
}

#[cfg(test)]
#[path = "ssh_handshake_tests.rs"]
mod tests;
