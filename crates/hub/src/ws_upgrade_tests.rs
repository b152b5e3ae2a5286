// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hyper::Request;

use super::*;

fn req_with(headers: &[(&str, &str)]) -> Request<()> {
    let mut builder = Request::builder().uri("/services/agent-proxy/register/c/e");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap()
}

#[test]
fn detects_upgrade_headers_case_insensitively() {
    let req = req_with(&[("Connection", "Upgrade"), ("Upgrade", "WebSocket")]);
    assert!(is_websocket_upgrade(&req));
}

#[test]
fn detects_upgrade_in_comma_list() {
    let req = req_with(&[("Connection", "keep-alive, Upgrade"), ("Upgrade", "websocket")]);
    assert!(is_websocket_upgrade(&req));
}

#[test]
fn rejects_plain_request() {
    let req = req_with(&[]);
    assert!(!is_websocket_upgrade(&req));
}

#[test]
fn rejects_missing_upgrade_header() {
    let req = req_with(&[("Connection", "Upgrade")]);
    assert!(!is_websocket_upgrade(&req));
}

#[test]
fn is_upgrade_request_accepts_non_websocket_upgrade_values() {
    let req = req_with(&[("Connection", "Upgrade"), ("Upgrade", "SPDY/3.1")]);
    assert!(is_upgrade_request(&req));
}

#[test]
fn is_upgrade_request_rejects_missing_connection_header() {
    let req = req_with(&[("Upgrade", "websocket")]);
    assert!(!is_upgrade_request(&req));
}

#[test]
fn handshake_response_derives_accept_key() {
    let req = req_with(&[
        ("Connection", "Upgrade"),
        ("Upgrade", "websocket"),
        ("Sec-WebSocket-Key", "dGhlIHNhbXBsZSBub25jZQ=="),
    ]);
    let resp = handshake_response(&req).expect("valid handshake");
    assert_eq!(resp.status(), hyper::StatusCode::SWITCHING_PROTOCOLS);
    assert_eq!(
        resp.headers().get("Sec-WebSocket-Accept").and_then(|v| v.to_str().ok()),
        Some("s3pPLMBiTxaQ9kYGzzhZRbK+xOo=")
    );
}

#[test]
fn handshake_response_rejects_non_upgrade() {
    let req = req_with(&[]);
    let resp = handshake_response(&req).unwrap_err();
    assert_eq!(resp.status(), hyper::StatusCode::BAD_REQUEST);
}

#[test]
fn handshake_response_rejects_missing_key() {
    let req = req_with(&[("Connection", "Upgrade"), ("Upgrade", "websocket")]);
    let resp = handshake_response(&req).unwrap_err();
    assert_eq!(resp.status(), hyper::StatusCode::BAD_REQUEST);
}
