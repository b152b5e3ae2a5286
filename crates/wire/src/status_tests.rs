// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn serializes_with_expected_field_names() {
    let status = Status::new(ErrorClass::AuthDenied, "no soup for you");
    let v = serde_json::to_value(&status).unwrap();
    assert_eq!(v["kind"], "Status");
    assert_eq!(v["apiVersion"], "v1");
    assert_eq!(v["status"], "Failure");
    assert_eq!(v["message"], "no soup for you");
    assert_eq!(v["reason"], "Forbidden");
    assert_eq!(v["code"], 403);
}
