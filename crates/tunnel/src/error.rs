// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TunnelError {
    #[error("tunnel closed")]
    Closed,
    #[error("dial timed out waiting for pickup")]
    DialTimeout,
    #[error("failed to write control message: {0}")]
    ControlSend(String),
    #[error("control message encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
