// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn displays_each_variant_lowercase() {
    assert_eq!(TokenClass::Static.to_string(), "static");
    assert_eq!(TokenClass::Invalid.to_string(), "invalid");
    assert_eq!(
        TokenClass::ServiceAccount(ServiceAccountClaims {
            cluster_name: "root:org".to_string(),
        })
        .to_string(),
        "service-account"
    );
    assert_eq!(
        TokenClass::Oidc(OidcClaims {
            issuer: "https://issuer.example".to_string(),
            subject: "sub-1".to_string(),
            email: None,
        })
        .to_string(),
        "oidc"
    );
}
