// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP Reverse Proxy over Tunnel (C6) and SSH Bridge (C7): per-request
//! dialing of tunnel-backed connections, the `/ssh` upgrade handshake, and
//! an SSH client bridging exec and interactive-PTY sessions to a caller's
//! WebSocket.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod http_proxy;
pub mod ssh;
pub mod ssh_handshake;
pub mod username;

pub use error::ProxyError;
pub use http_proxy::{bridge_upgrade, round_trip, rewrite_k8s_path};
pub use ssh::{
    connect, decode_client_frame, drive_pty_session, exec_command, open_pty_session,
    AcceptAnyHostKey, PtyAction, SshAuth,
};
pub use ssh_handshake::{upgrade, PrebufferedConn};
pub use username::select_username;
