// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn conflict_exhaustion_maps_to_concurrency_conflict() {
    assert_eq!(StoreError::ConflictRetriesExhausted(5).class(), ErrorClass::ConcurrencyConflict);
}

#[test]
fn not_found_and_backend_map_to_upstream_io() {
    assert_eq!(StoreError::NotFound.class(), ErrorClass::UpstreamIo);
    assert_eq!(StoreError::InvalidCluster("bad".into()).class(), ErrorClass::UpstreamIo);
}
