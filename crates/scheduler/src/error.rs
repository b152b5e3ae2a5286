// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("object store error: {0}")]
    Store(#[from] kedge_store::StoreError),
    #[error("object store request failed: {0}")]
    Kube(#[from] kube::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
