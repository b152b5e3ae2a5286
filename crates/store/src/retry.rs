// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic-concurrency retry for status updates, per §7's error table:
//! a `resourceVersion` conflict is retried in-process up to 5 times,
//! re-reading before each retry, before surfacing to the caller.

use kube::api::{Api, Patch, PatchParams};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Maximum in-process retries on a `resourceVersion` conflict before the
/// error is surfaced to the caller.
pub const MAX_CONFLICT_RETRIES: u32 = 5;

/// The two `kube::Api` calls the retry loop drives, narrowed to a trait so
/// tests can run the loop against a fake that counts calls and injects
/// conflicts instead of a real API server.
trait StatusPatcher<K> {
    async fn get(&self, name: &str) -> Result<K, kube::Error>;
    async fn patch_status(&self, name: &str, patch: &serde_json::Value) -> Result<K, kube::Error>;
}

impl<K> StatusPatcher<K> for Api<K>
where
    K: Resource + Clone + DeserializeOwned + Serialize + std::fmt::Debug,
    K::DynamicType: Default,
{
    async fn get(&self, name: &str) -> Result<K, kube::Error> {
        Api::get(self, name).await
    }

    async fn patch_status(&self, name: &str, patch: &serde_json::Value) -> Result<K, kube::Error> {
        Api::patch_status(self, name, &PatchParams::default(), &Patch::Merge(patch)).await
    }
}

/// Re-reads `name`, calls `mutate` on a clone of its current status, and
/// patches `status` with the result via a merge patch. On a 409 conflict
/// the whole cycle (re-read, mutate, patch) is retried up to
/// [`MAX_CONFLICT_RETRIES`] times — six total `patch_status` attempts (the
/// initial one plus five retries) before the conflict is surfaced.
pub async fn update_status_with_retry<K, S>(
    api: &Api<K>,
    name: &str,
    mutate: impl Fn(&K) -> S,
) -> Result<K, StoreError>
where
    K: Resource + Clone + DeserializeOwned + Serialize + std::fmt::Debug,
    K::DynamicType: Default,
    S: Serialize,
{
    retry_with(api, name, mutate).await
}

async fn retry_with<K, S, P>(api: &P, name: &str, mutate: impl Fn(&K) -> S) -> Result<K, StoreError>
where
    P: StatusPatcher<K>,
    K: Resource + std::fmt::Debug,
    K::DynamicType: Default,
    S: Serialize,
{
    let mut attempt = 0;
    loop {
        let current = api.get(name).await.map_err(StoreError::Backend)?;
        let new_status = mutate(&current);
        let patch = serde_json::json!({ "status": new_status });

        match api.patch_status(name, &patch).await {
            Ok(updated) => return Ok(updated),
            Err(e) if is_conflict(&e) => {
                attempt += 1;
                if attempt > MAX_CONFLICT_RETRIES {
                    return Err(StoreError::ConflictRetriesExhausted(attempt - 1));
                }
                tracing::debug!(
                    name = name,
                    resource_version = current.resource_version().unwrap_or_default(),
                    attempt,
                    "status update conflict, retrying"
                );
                continue;
            }
            Err(e) => return Err(StoreError::Backend(e)),
        }
    }
}

/// `true` iff `err` is a 409 (resourceVersion conflict) from the API
/// server, as opposed to any other transport or server failure.
fn is_conflict(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(resp) if resp.code == 409)
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
