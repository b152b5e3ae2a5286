// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> LoginResponse {
    LoginResponse {
        kubeconfig: "a2luZDoga2VkZ2U=".to_string(),
        expires_at: 1_800_000_000,
        email: Some("alice@example.com".to_string()),
        user_id: "alice".to_string(),
        id_token: "id-token".to_string(),
        refresh_token: Some("refresh-token".to_string()),
        issuer_url: "https://issuer.example".to_string(),
        client_id: "kedge-cli".to_string(),
        client_secret: None,
    }
}

#[test]
fn round_trips_through_base64_json() {
    let resp = sample();
    let encoded = resp.to_base64_json().unwrap();
    let decoded_json =
        base64::Engine::decode(&base64::engine::general_purpose::STANDARD, encoded).unwrap();
    let decoded: LoginResponse = serde_json::from_slice(&decoded_json).unwrap();
    assert_eq!(decoded, resp);
}

#[test]
fn omits_absent_optional_fields() {
    let resp = sample();
    let v = serde_json::to_value(&resp).unwrap();
    assert!(v.get("clientSecret").is_none());
    assert_eq!(v["refreshToken"], "refresh-token");
}
