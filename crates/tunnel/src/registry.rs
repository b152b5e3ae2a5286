// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Connection Registry (C2): a process-wide `tunnel-key -> Dialer` map.
//! The only shared mutable in-process state in the hub; everything else is
//! either read-only after startup or owned by a single task.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::mux::DialerHandle;

#[derive(Default)]
pub struct ConnectionRegistry {
    entries: RwLock<HashMap<String, Arc<dyn DialerHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `dialer` under `key`, closing whatever was previously
    /// registered there so no handle leaks.
    pub fn store(&self, key: impl Into<String>, dialer: Arc<dyn DialerHandle>) {
        let previous = {
            let mut entries = self.entries.write();
            entries.insert(key.into(), dialer)
        };
        if let Some(previous) = previous {
            previous.close();
        }
    }

    pub fn load(&self, key: &str) -> Option<Arc<dyn DialerHandle>> {
        self.entries.read().get(key).cloned()
    }

    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Closes every currently-registered dialer, leaving the map empty.
    /// Used on hub shutdown (§5: "graceful HTTP shutdown followed by
    /// cancellation of all tunnels") — closing each handle trips its
    /// `Done`, which every `run_agent_tunnel` task is also selecting on,
    /// so in-flight tunnels unwind themselves rather than being dropped
    /// out from under their owning task.
    pub fn close_all(&self) {
        let drained: Vec<Arc<dyn DialerHandle>> = {
            let mut entries = self.entries.write();
            entries.drain().map(|(_, dialer)| dialer).collect()
        };
        for dialer in drained {
            dialer.close();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
