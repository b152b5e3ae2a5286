// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Edge Lifecycle heartbeat reconciler (C10, heartbeat half): after
//! [`kedge_core::heartbeat::TIMEOUT`] without a fresh heartbeat on a
//! `connected` edge, flips it to `Disconnected`. Already-disconnected edges
//! are left alone.

use chrono::DateTime;
use kube::api::Api;
use tokio_util::sync::CancellationToken;

use kedge_core::edge::{EdgePhase, EdgeStatus};
use kedge_core::heartbeat::{NOMINAL_INTERVAL, TIMEOUT};
use kedge_core::{Clock, Edge};
use kedge_store::ObjectStore;

use crate::error::SchedulerError;

/// `true` iff `last_heartbeat_time` (RFC 3339) is older than `timeout`
/// relative to `now_epoch_ms`. An unparsable timestamp is treated as stale
/// rather than silently never timing out.
pub fn is_stale(last_heartbeat_time: &str, now_epoch_ms: u64, timeout: std::time::Duration) -> bool {
    match DateTime::parse_from_rfc3339(last_heartbeat_time) {
        Ok(parsed) => {
            let heartbeat_ms = u64::try_from(parsed.timestamp_millis()).unwrap_or(0);
            now_epoch_ms.saturating_sub(heartbeat_ms) > u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
        }
        Err(_) => true,
    }
}

/// Computes the new status for a `connected` edge whose heartbeat has gone
/// stale, or `None` if no rewrite is needed.
pub fn heartbeat_decision(
    status: &EdgeStatus,
    now_epoch_ms: u64,
    timeout: std::time::Duration,
) -> Option<EdgeStatus> {
    if !status.connected {
        return None;
    }
    let stale = status
        .last_heartbeat_time
        .as_deref()
        .map(|ts| is_stale(ts, now_epoch_ms, timeout))
        .unwrap_or(true);
    if !stale {
        return None;
    }
    Some(EdgeStatus { connected: false, phase: EdgePhase::Disconnected, ..status.clone() })
}

async fn sweep<C: Clock>(store: &ObjectStore, clock: &C) -> Result<(), SchedulerError> {
    let edges_api: Api<Edge> = store.cluster_scoped();
    let now = clock.epoch_ms();
    for edge in store.list(&edges_api).await? {
        let (Some(name), Some(status)) = (edge.metadata.name.as_deref(), edge.status.as_ref()) else {
            continue;
        };
        if let Some(new_status) = heartbeat_decision(status, now, TIMEOUT) {
            tracing::info!(edge = name, "heartbeat timeout, marking disconnected");
            kedge_store::update_status_with_retry(&edges_api, name, move |_| new_status.clone()).await?;
        }
    }
    Ok(())
}

/// Scans every edge once per [`NOMINAL_INTERVAL`] (the heartbeat window),
/// applying [`heartbeat_decision`] to each.
pub async fn run<C: Clock>(store: ObjectStore, clock: C, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(NOMINAL_INTERVAL);
    loop {
        tokio::select! {
            () = cancel.cancelled() => return,
            _ = ticker.tick() => {
                if let Err(e) = sweep(&store, &clock).await {
                    tracing::warn!(%e, "heartbeat sweep failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
