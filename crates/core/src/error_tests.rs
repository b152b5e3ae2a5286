// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn http_status_matches_error_handling_table() {
    assert_eq!(ErrorClass::AuthMissing.http_status(), 401);
    assert_eq!(ErrorClass::AuthDenied.http_status(), 403);
    assert_eq!(ErrorClass::TunnelMissing.http_status(), 502);
    assert_eq!(ErrorClass::UpstreamIo.http_status(), 502);
    assert_eq!(ErrorClass::ConcurrencyConflict.http_status(), 409);
    assert_eq!(ErrorClass::BadRequest.http_status(), 400);
    assert_eq!(ErrorClass::NotFound.http_status(), 404);
}

#[test]
fn reason_is_pascal_case_and_matches_display() {
    assert_eq!(ErrorClass::AuthDenied.reason(), "Forbidden");
    assert_eq!(ErrorClass::AuthDenied.to_string(), "Forbidden");
}
