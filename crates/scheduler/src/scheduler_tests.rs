// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn requeue_interval_matches_the_scheduler_minimum() {
    assert_eq!(REQUEUE_INTERVAL, Duration::from_secs(30));
}
