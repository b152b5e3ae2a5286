// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn dummy_conn() -> BoxConn {
    let (a, _b) = tokio::io::duplex(64);
    Box::new(a)
}

#[test]
fn reserve_yields_unique_ids() {
    let table = PickupTable::new();
    let (id1, _rx1) = table.reserve();
    let (id2, _rx2) = table.reserve();
    assert_ne!(id1, id2);
}

#[tokio::test]
async fn complete_delivers_conn_to_waiting_receiver() {
    let table = PickupTable::new();
    let (id, rx) = table.reserve();

    assert!(table.complete(id, dummy_conn()));
    assert!(rx.await.is_ok());
}

#[test]
fn complete_returns_false_for_unknown_id() {
    let table = PickupTable::new();
    let (id, _rx) = table.reserve();
    table.cancel(id);
    assert!(!table.complete(id, dummy_conn()));
}
