// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide table correlating a pickup id (sent to the agent on the
//! control stream) with the `Dial` call waiting for it. The pickup HTTP
//! endpoint (`kedge_hub`) is the only other reader/writer of this table;
//! the 128-bit id is the sole capability, per design — no further
//! authorization happens on pickup.

use std::collections::HashMap;

use kedge_wire::PickupId;
use parking_lot::Mutex;
use rand::RngCore;
use tokio::sync::oneshot;

use crate::conn::BoxConn;

#[derive(Default)]
pub struct PickupTable {
    waiters: Mutex<HashMap<PickupId, oneshot::Sender<BoxConn>>>,
}

impl PickupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a fresh random pickup id and a receiver that resolves once
    /// [`PickupTable::complete`] is called for it.
    pub fn reserve(&self) -> (PickupId, oneshot::Receiver<BoxConn>) {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        let id = PickupId::from_bytes(bytes);
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().insert(id, tx);
        (id, rx)
    }

    /// Hands a picked-up connection to the waiting `Dial`. Returns `false`
    /// if no (or no longer any) waiter exists for `id` — the pickup
    /// arrived too late or the id was never reserved — in which case the
    /// caller should close the connection.
    pub fn complete(&self, id: PickupId, conn: BoxConn) -> bool {
        let sender = self.waiters.lock().remove(&id);
        match sender {
            Some(tx) => tx.send(conn).is_ok(),
            None => false,
        }
    }

    /// Removes a reservation that timed out without a pickup arriving.
    pub fn cancel(&self, id: PickupId) {
        self.waiters.lock().remove(&id);
    }
}

#[cfg(test)]
#[path = "pickup_tests.rs"]
mod tests;
