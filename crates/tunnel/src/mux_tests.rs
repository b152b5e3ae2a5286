// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use futures_util::StreamExt;

use super::*;

async fn control_pair() -> (
    WebSocketStream<tokio::io::DuplexStream>,
    WebSocketStream<tokio::io::DuplexStream>,
) {
    let (client_io, server_io) = tokio::io::duplex(4096);
    let client_fut = tokio_tungstenite::client_async("ws://local/", client_io);
    let server_fut = tokio_tungstenite::accept_async(server_io);
    let (client_res, server_res) = tokio::join!(client_fut, server_fut);
    (client_res.expect("client handshake").0, server_res.expect("server handshake"))
}

#[tokio::test]
async fn dial_sends_control_message_then_times_out_without_pickup() {
    let (hub_side, mut agent_side) = control_pair().await;
    let pickups = Arc::new(PickupTable::new());
    let (mux, _task) = Mux::spawn(hub_side, pickups);

    let dial = tokio::spawn({
        async move { mux.dial(Duration::from_millis(50)).await }
    });

    let msg = agent_side.next().await.expect("control message").expect("ok");
    let text = msg.into_text().expect("text frame");
    assert!(text.contains("\"dial\""));

    let result = dial.await.expect("join");
    assert!(matches!(result, Err(TunnelError::DialTimeout)));
}

#[tokio::test]
async fn closing_control_stream_marks_mux_done() {
    let (hub_side, agent_side) = control_pair().await;
    let pickups = Arc::new(PickupTable::new());
    let (mux, task) = Mux::spawn(hub_side, pickups);

    drop(agent_side);
    task.await.expect("task");

    assert!(mux.is_done());
    let result = mux.dial(Duration::from_millis(50)).await;
    assert!(matches!(result, Err(TunnelError::Closed)));
}

#[tokio::test]
async fn close_cancels_done_immediately() {
    let (hub_side, _agent_side) = control_pair().await;
    let pickups = Arc::new(PickupTable::new());
    let (mux, _task) = Mux::spawn(hub_side, pickups);

    assert!(!mux.is_done());
    mux.close();
    assert!(mux.is_done());
}
