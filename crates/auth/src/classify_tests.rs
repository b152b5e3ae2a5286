// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

fn make_sa_jwt(cluster: &str) -> String {
    let payload = format!(r#"{{"iss":"kubernetes/serviceaccount","clusterName":"{cluster}"}}"#);
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
        URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        "sig"
    )
}

#[test]
fn static_token_wins_even_if_jwt_shaped() {
    // A static token happens to look like a 3-segment JWT; classification
    // must still resolve it as Static since that check runs first.
    let shaped = "a.b.c".to_string();
    let store = StaticTokenStore::new(vec![shaped.clone()]);
    assert_eq!(classify(&shaped, &store, None), TokenClass::Static);
}

#[test]
fn service_account_jwt_classifies_without_oidc_configured() {
    let store = StaticTokenStore::default();
    let token = make_sa_jwt("root:kedge:users:alice");
    match classify(&token, &store, None) {
        TokenClass::ServiceAccount(claims) => assert_eq!(claims.cluster_name, "root:kedge:users:alice"),
        other => panic!("expected ServiceAccount, got {other:?}"),
    }
}

#[test]
fn opaque_token_without_oidc_is_invalid() {
    let store = StaticTokenStore::default();
    assert_eq!(classify("opaque-garbage", &store, None), TokenClass::Invalid);
}

#[test]
fn empty_token_is_invalid() {
    let store = StaticTokenStore::default();
    assert_eq!(classify("", &store, None), TokenClass::Invalid);
}
