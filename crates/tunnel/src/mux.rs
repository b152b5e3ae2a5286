// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Reverse-Dialer Mux (C1): turns one agent WebSocket into a
//! `Dial()`-able source of fresh connections, by asking the agent (over
//! the control stream) to open a new back-dial WebSocket per `Dial` call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex as AsyncMutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tokio_util::sync::CancellationToken;

use kedge_wire::ControlMessage;

use crate::conn::BoxConn;
use crate::error::TunnelError;
use crate::pickup::PickupTable;

/// Lower bound on how long a `Dial` waits for the agent to complete a
/// pickup before giving up, per the reverse-dialer's failure semantics.
pub const MIN_DIAL_TIMEOUT: Duration = Duration::from_secs(15);

/// A handle to a live Mux, stored in the [`crate::registry::ConnectionRegistry`]
/// as `Arc<dyn DialerHandle>` so the registry doesn't need to be generic
/// over the agent's transport type.
#[async_trait]
pub trait DialerHandle: Send + Sync {
    async fn dial(&self, timeout: Duration) -> Result<BoxConn, TunnelError>;
    fn is_done(&self) -> bool;
    async fn closed(&self);
    fn close(&self);
}

/// A Reverse-Dialer Mux over one agent's control WebSocket.
pub struct Mux<S> {
    sink: Arc<AsyncMutex<SplitSink<WebSocketStream<S>, Message>>>,
    pickups: Arc<PickupTable>,
    dial_lock: Arc<AsyncMutex<()>>,
    done: CancellationToken,
}

impl<S> Mux<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Splits `control` into its write half (kept for sending `Dial`
    /// control messages) and spawns a task that drains the read half
    /// until it errors or closes, at which point the Mux becomes done.
    /// Returns the Mux and the background task's handle.
    pub fn spawn(
        control: WebSocketStream<S>,
        pickups: Arc<PickupTable>,
    ) -> (Self, tokio::task::JoinHandle<()>) {
        let (sink, mut stream) = control.split();
        let done = CancellationToken::new();
        let done_for_task = done.clone();

        let handle = tokio::spawn(async move {
            loop {
                match stream.next().await {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => {
                        tracing::debug!(%err, "mux control stream error, closing");
                        break;
                    }
                }
            }
            done_for_task.cancel();
        });

        (
            Self {
                sink: Arc::new(AsyncMutex::new(sink)),
                pickups,
                dial_lock: Arc::new(AsyncMutex::new(())),
                done,
            },
            handle,
        )
    }
}

#[async_trait]
impl<S> DialerHandle for Mux<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    async fn dial(&self, timeout: Duration) -> Result<BoxConn, TunnelError> {
        if self.done.is_cancelled() {
            return Err(TunnelError::Closed);
        }

        // At most one in-flight Dial per Mux.
        let _permit = self.dial_lock.lock().await;

        let (pickup_id, rx) = self.pickups.reserve();
        let msg = serde_json::to_string(&ControlMessage::Dial { pickup_id })?;

        {
            let mut sink = self.sink.lock().await;
            sink.send(Message::Text(msg))
                .await
                .map_err(|e| TunnelError::ControlSend(e.to_string()))?;
        }

        tokio::select! {
            result = rx => {
                result.map_err(|_| TunnelError::DialTimeout)
            }
            _ = tokio::time::sleep(timeout) => {
                self.pickups.cancel(pickup_id);
                Err(TunnelError::DialTimeout)
            }
            _ = self.done.cancelled() => {
                self.pickups.cancel(pickup_id);
                Err(TunnelError::Closed)
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done.is_cancelled()
    }

    async fn closed(&self) {
        self.done.cancelled().await;
    }

    fn close(&self) {
        self.done.cancel();
    }
}

#[cfg(test)]
#[path = "mux_tests.rs"]
mod tests;
