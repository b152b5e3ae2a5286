// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn login_state_round_trips_through_encode_decode() {
    let state = LoginState { redirect: "http://127.0.0.1:9999/callback?sid=abc".to_string(), nonce: "abc123".to_string() };
    let encoded = encode_state(&state).unwrap();
    let decoded = decode_state(&encoded).unwrap();
    assert_eq!(decoded.redirect, state.redirect);
    assert_eq!(decoded.nonce, state.nonce);
}

#[test]
fn decode_state_rejects_garbage() {
    assert!(decode_state("not valid base64!!!").is_err());
}

#[test]
fn redirect_to_builds_a_302_with_location() {
    let resp = redirect_to("https://idp.example/authorize?x=1");
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(hyper::header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("https://idp.example/authorize?x=1")
    );
}
