// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kedge_core::ErrorClass;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("no tunnel registered for this edge")]
    TunnelMissing,
    #[error("dialing the tunnel failed: {0}")]
    Dial(#[from] kedge_tunnel::TunnelError),
    #[error("agent's local HTTP endpoint returned an error: {0}")]
    Http(String),
    #[error("agent's /ssh upgrade handshake failed: {0}")]
    SshHandshake(String),
    #[error("SSH session error: {0}")]
    Ssh(String),
    #[error("I/O error bridging the tunnel connection: {0}")]
    Io(#[from] std::io::Error),
}

impl ProxyError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ProxyError::TunnelMissing => ErrorClass::TunnelMissing,
            ProxyError::Dial(_)
            | ProxyError::Http(_)
            | ProxyError::SshHandshake(_)
            | ProxyError::Ssh(_)
            | ProxyError::Io(_) => ErrorClass::UpstreamIo,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
