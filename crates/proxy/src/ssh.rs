// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The SSH Bridge (C7): builds an SSH client over a tunnel-backed
//! connection (after the `/ssh` upgrade handshake) and either runs a
//! single remote command or bridges an interactive PTY session to the
//! caller's WebSocket using the control protocol in `kedge_wire`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use russh::client::{self, Handle};
use russh::ChannelMsg;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;

use kedge_wire::ClientFrame;

use crate::error::ProxyError;

/// Host-key verifier that accepts any key, logging a warning on every
/// session. Implements the open question in §9 / DESIGN.md: this hub does
/// not pin or trust-on-first-use an edge's host key.
pub struct AcceptAnyHostKey;

#[async_trait::async_trait]
impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh_keys::key::PublicKey,
    ) -> Result<bool, Self::Error> {
        tracing::warn!("accepting SSH host key without verification (accept-any policy)");
        Ok(true)
    }
}

/// Credentials to authenticate the hub's own SSH client against the
/// edge's sshd, resolved by the caller (`kedge-hub`) from
/// `status.sshCredentials`'s secret references before this module ever
/// sees them.
pub enum SshAuth {
    None,
    Password(String),
    PrivateKeyPem(String),
}

/// Connects an SSH client over `stream` (already past the `/ssh` upgrade
/// handshake) and authenticates as `username`.
pub async fn connect<S>(stream: S, username: &str, auth: SshAuth) -> Result<Handle<AcceptAnyHostKey>, ProxyError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let config = Arc::new(client::Config::default());
    let mut handle = client::connect_stream(config, stream, AcceptAnyHostKey)
        .await
        .map_err(|e| ProxyError::Ssh(e.to_string()))?;

    let authenticated = match auth {
        SshAuth::None => {
            handle.authenticate_none(username).await.map_err(|e| ProxyError::Ssh(e.to_string()))?
        }
        SshAuth::Password(password) => handle
            .authenticate_password(username, password)
            .await
            .map_err(|e| ProxyError::Ssh(e.to_string()))?,
        SshAuth::PrivateKeyPem(pem) => {
            let key = russh_keys::decode_secret_key(&pem, None)
                .map_err(|e| ProxyError::Ssh(format!("decoding private key: {e}")))?;
            handle
                .authenticate_publickey(username, Arc::new(key))
                .await
                .map_err(|e| ProxyError::Ssh(e.to_string()))?
        }
    };

    if !authenticated {
        return Err(ProxyError::Ssh("SSH authentication rejected".into()));
    }

    Ok(handle)
}

/// Runs `command` to completion on a fresh exec channel, returning the
/// combined stdout+stderr bytes in arrival order. The caller is
/// responsible for forwarding them to the browser/CLI as one or more
/// binary WebSocket frames and then closing the WebSocket.
pub async fn exec_command(
    handle: &Handle<AcceptAnyHostKey>,
    command: &str,
) -> Result<Vec<u8>, ProxyError> {
    let mut channel =
        handle.channel_open_session().await.map_err(|e| ProxyError::Ssh(e.to_string()))?;
    channel.exec(true, command).await.map_err(|e| ProxyError::Ssh(e.to_string()))?;

    let mut output = Vec::new();
    loop {
        match channel.wait().await {
            Some(ChannelMsg::Data { data }) => output.extend_from_slice(&data),
            Some(ChannelMsg::ExtendedData { data, .. }) => output.extend_from_slice(&data),
            Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => break,
            Some(ChannelMsg::ExitStatus { .. }) | Some(_) => continue,
        }
    }
    Ok(output)
}

/// Decodes one `ClientFrame` control message (one JSON text frame of the
/// SSH sub-protocol) into the action the PTY bridge should take.
pub enum PtyAction {
    /// Bytes to write to the remote PTY's stdin.
    Write(Vec<u8>),
    /// New terminal dimensions.
    Resize { cols: u32, rows: u32 },
    /// Keepalive; no action beyond staying connected.
    Heartbeat,
}

/// Parses a `ClientFrame` JSON text frame and base64-decodes `cmd`
/// payloads. Malformed base64 is rejected rather than silently dropped.
pub fn decode_client_frame(text: &str) -> Result<PtyAction, ProxyError> {
    let frame: ClientFrame =
        serde_json::from_str(text).map_err(|e| ProxyError::Ssh(format!("malformed control frame: {e}")))?;
    match frame {
        ClientFrame::Cmd { cmd } => {
            let bytes =
                BASE64.decode(cmd).map_err(|e| ProxyError::Ssh(format!("malformed base64 cmd: {e}")))?;
            Ok(PtyAction::Write(bytes))
        }
        ClientFrame::Resize { cols, rows } => Ok(PtyAction::Resize { cols, rows }),
        ClientFrame::Heartbeat { .. } => Ok(PtyAction::Heartbeat),
    }
}

/// Opens an interactive PTY session: requests a PTY and a shell on a
/// fresh channel sized `(cols, rows)`. The caller drives the resulting
/// channel with `control_rx` (decoded `PtyAction`s from the caller's
/// WebSocket) and forwards `ChannelMsg::Data`/`ExtendedData` back out
/// itself — kept here as a function rather than a loop so the three
/// concurrent tasks (WS->SSH, SSH->WS, resize forwarder) the concurrency
/// model calls for can own their own halves.
pub async fn open_pty_session(
    handle: &Handle<AcceptAnyHostKey>,
    cols: u32,
    rows: u32,
) -> Result<russh::Channel<client::Msg>, ProxyError> {
    let channel =
        handle.channel_open_session().await.map_err(|e| ProxyError::Ssh(e.to_string()))?;
    channel
        .request_pty(false, "xterm", cols, rows, 0, 0, &[])
        .await
        .map_err(|e| ProxyError::Ssh(e.to_string()))?;
    channel.request_shell(true).await.map_err(|e| ProxyError::Ssh(e.to_string()))?;
    Ok(channel)
}

/// Drives one interactive PTY session end-to-end: a task reading
/// `control_rx` (decoded frames from the caller's WebSocket) writes to
/// the channel's stdin and forwards resizes; the channel's own data
/// events are sent to `output_tx` as they arrive. Returns once the
/// channel closes or `control_rx` is dropped.
pub async fn drive_pty_session(
    mut channel: russh::Channel<client::Msg>,
    mut control_rx: mpsc::Receiver<PtyAction>,
    output_tx: mpsc::Sender<Vec<u8>>,
) -> Result<(), ProxyError> {
    loop {
        tokio::select! {
            action = control_rx.recv() => {
                match action {
                    Some(PtyAction::Write(bytes)) => {
                        channel.data(bytes.as_ref()).await.map_err(|e| ProxyError::Ssh(e.to_string()))?;
                    }
                    Some(PtyAction::Resize { cols, rows }) => {
                        channel
                            .window_change(cols, rows, 0, 0)
                            .await
                            .map_err(|e| ProxyError::Ssh(e.to_string()))?;
                    }
                    Some(PtyAction::Heartbeat) => {}
                    None => return Ok(()),
                }
            }
            msg = channel.wait() => {
                match msg {
                    Some(ChannelMsg::Data { data }) | Some(ChannelMsg::ExtendedData { data, .. }) => {
                        if output_tx.send(data.to_vec()).await.is_err() {
                            return Ok(());
                        }
                    }
                    Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "ssh_tests.rs"]
mod tests;
