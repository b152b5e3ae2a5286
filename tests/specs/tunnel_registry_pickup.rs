// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A `Dial` that actually completes via the pickup table, end to end
//! through the Connection Registry — the one path each crate's own unit
//! tests stop short of wiring together (§8 "Registry exclusivity",
//! "Dial<->Done").

use std::sync::Arc;
use std::time::Duration;

use kedge_tunnel::{BoxConn, ConnectionRegistry, DialerHandle, Mux, PickupTable};

async fn control_pair() -> (
    tokio_tungstenite::WebSocketStream<tokio::io::DuplexStream>,
    tokio_tungstenite::WebSocketStream<tokio::io::DuplexStream>,
) {
    let (client_io, server_io) = tokio::io::duplex(4096);
    let client_fut = tokio_tungstenite::client_async("ws://local/", client_io);
    let server_fut = tokio_tungstenite::accept_async(server_io);
    let (client_res, server_res) = tokio::join!(client_fut, server_fut);
    (client_res.expect("client handshake").0, server_res.expect("server handshake"))
}

/// Extracts the pickup id the Mux wrote to the agent's side of the control
/// stream, mirroring what the real agent would read before opening its
/// back-dial WebSocket to `/services/agent-proxy/proxy?id=<id>`.
async fn read_pickup_id(
    agent_side: &mut tokio_tungstenite::WebSocketStream<tokio::io::DuplexStream>,
) -> kedge_wire::PickupId {
    use futures_util::StreamExt;
    let msg = agent_side.next().await.expect("control message").expect("ok");
    let text = msg.into_text().expect("text frame");
    let control: kedge_wire::ControlMessage = serde_json::from_str(&text).expect("valid control message");
    match control {
        kedge_wire::ControlMessage::Dial { pickup_id } => pickup_id,
    }
}

#[tokio::test]
async fn dial_through_registry_resolves_once_pickup_completes() {
    let pickups = Arc::new(PickupTable::new());
    let (hub_side, mut agent_side) = control_pair().await;
    let (mux, _control_task) = Mux::spawn(hub_side, pickups.clone());

    let registry = ConnectionRegistry::new();
    registry.store("edges/root:kedge/edge-a", Arc::new(mux) as Arc<dyn DialerHandle>);

    let dialer = registry.load("edges/root:kedge/edge-a").expect("registered");
    let dial_task = tokio::spawn(async move { dialer.dial(Duration::from_secs(5)).await });

    let pickup_id = read_pickup_id(&mut agent_side).await;
    let (back_dial, _picked_up): (tokio::io::DuplexStream, tokio::io::DuplexStream) = tokio::io::duplex(64);
    let conn: BoxConn = Box::new(back_dial);
    assert!(pickups.complete(pickup_id, conn), "dial was still waiting for this pickup id");

    let result = dial_task.await.expect("join");
    assert!(result.is_ok(), "dial should resolve once the pickup arrives");
}

#[tokio::test]
async fn registering_a_new_tunnel_at_the_same_key_closes_the_old_one() {
    let pickups = Arc::new(PickupTable::new());
    let registry = ConnectionRegistry::new();

    let (first_hub, _first_agent) = control_pair().await;
    let (first_mux, _first_task) = Mux::spawn(first_hub, pickups.clone());
    let first: Arc<dyn DialerHandle> = Arc::new(first_mux);
    registry.store("edges/root:kedge/edge-a", first.clone());

    let (second_hub, _second_agent) = control_pair().await;
    let (second_mux, _second_task) = Mux::spawn(second_hub, pickups.clone());
    let second: Arc<dyn DialerHandle> = Arc::new(second_mux);
    registry.store("edges/root:kedge/edge-a", second.clone());

    assert!(first.is_done(), "the superseded dialer must be closed, not leaked");
    let loaded = registry.load("edges/root:kedge/edge-a").expect("present");
    assert!(!loaded.is_done(), "the new dialer must remain usable");
}

#[tokio::test]
async fn close_all_tears_down_every_registered_tunnel() {
    let pickups = Arc::new(PickupTable::new());
    let registry = ConnectionRegistry::new();

    let (first_hub, _first_agent) = control_pair().await;
    let (first_mux, _first_task) = Mux::spawn(first_hub, pickups.clone());
    let first: Arc<dyn DialerHandle> = Arc::new(first_mux);
    registry.store("edges/root:kedge/edge-a", first.clone());

    let (second_hub, _second_agent) = control_pair().await;
    let (second_mux, _second_task) = Mux::spawn(second_hub, pickups.clone());
    let second: Arc<dyn DialerHandle> = Arc::new(second_mux);
    registry.store("edges/root:kedge/edge-b", second.clone());

    registry.close_all();

    assert!(first.is_done(), "shutdown must close every live tunnel, not just the newest");
    assert!(second.is_done(), "shutdown must close every live tunnel, not just the newest");
    assert!(registry.load("edges/root:kedge/edge-a").is_none());
    assert!(registry.load("edges/root:kedge/edge-b").is_none());
}
