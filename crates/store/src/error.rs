// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kedge_core::ErrorClass;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found")]
    NotFound,
    #[error("object store request failed: {0}")]
    Backend(#[from] kube::Error),
    #[error("optimistic concurrency conflict exhausted its retries after {0} attempts")]
    ConflictRetriesExhausted(u32),
    #[error("invalid logical cluster url: {0}")]
    InvalidCluster(String),
}

impl StoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            StoreError::NotFound | StoreError::Backend(_) | StoreError::InvalidCluster(_) => {
                ErrorClass::UpstreamIo
            }
            StoreError::ConflictRetriesExhausted(_) => ErrorClass::ConcurrencyConflict,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
