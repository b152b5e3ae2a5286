// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON text-frame sub-protocol the SSH bridge (`kedge_proxy::ssh`) speaks
//! with the browser/CLI WebSocket. Server→client output travels as binary
//! frames and is not modelled here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Base64-encoded bytes to write to the remote PTY's stdin.
    Cmd {
        cmd: String,
    },
    Resize {
        cols: u32,
        rows: u32,
    },
    Heartbeat {
        #[serde(default)]
        data: String,
    },
}

#[cfg(test)]
#[path = "ssh_protocol_tests.rs"]
mod tests;
