// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn closed_has_fixed_message() {
    assert_eq!(TunnelError::Closed.to_string(), "tunnel closed");
}
