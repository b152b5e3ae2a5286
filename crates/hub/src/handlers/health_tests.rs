// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn healthz_is_200_ok() {
    assert_eq!(healthz().status(), StatusCode::OK);
}

#[test]
fn readyz_is_200_ok() {
    assert_eq!(readyz().status(), StatusCode::OK);
}
