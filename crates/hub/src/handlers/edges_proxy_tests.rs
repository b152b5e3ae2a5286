// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hyper::{HeaderMap, Method, Uri};
use kedge_core::{OidcClaims, ServiceAccountClaims};

use super::*;

#[test]
fn static_tokens_are_allowed_outright() {
    assert!(matches!(proxy_policy(&TokenClass::Static), ProxyPolicy::Allow));
}

#[test]
fn service_account_tokens_require_sar() {
    let claims = ServiceAccountClaims { cluster_name: "root:kedge".to_string() };
    assert!(matches!(proxy_policy(&TokenClass::ServiceAccount(claims)), ProxyPolicy::RequireSubjectAccessReview));
}

#[test]
fn oidc_tokens_require_cluster_match() {
    let claims = OidcClaims { issuer: "https://idp".to_string(), subject: "u".to_string(), email: None };
    assert!(matches!(proxy_policy(&TokenClass::Oidc(claims)), ProxyPolicy::RequireOidcClusterMatch));
}

#[test]
fn invalid_tokens_are_denied() {
    let decision = proxy_policy(&TokenClass::Invalid);
    assert!(matches!(decision, ProxyPolicy::Deny(ErrorClass::AuthMissing, _)));
}

#[test]
fn oidc_identity_extracts_email_and_subject() {
    let claims = OidcClaims { issuer: "https://idp".to_string(), subject: "u-1".to_string(), email: Some("a@b.com".to_string()) };
    let (email, sub) = oidc_identity(&TokenClass::Oidc(claims));
    assert_eq!(email.as_deref(), Some("a@b.com"));
    assert_eq!(sub.as_deref(), Some("u-1"));
}

#[test]
fn oidc_identity_is_empty_for_non_oidc_classes() {
    let (email, sub) = oidc_identity(&TokenClass::Static);
    assert_eq!(email, None);
    assert_eq!(sub, None);
}

#[test]
fn build_upstream_request_rewrites_path_and_preserves_query() {
    let headers = HeaderMap::new();
    let uri: Uri = "/whatever?watch=true".parse().unwrap();
    let req = build_upstream_request(&Method::GET, &uri, &headers, "api/v1/pods", ()).unwrap();
    assert_eq!(req.uri().path(), "/k8s/api/v1/pods");
    assert_eq!(req.uri().query(), Some("watch=true"));
}

#[test]
fn build_upstream_request_drops_hop_by_hop_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("proxy-connection", "keep-alive".parse().unwrap());
    headers.insert("authorization", "Bearer xyz".parse().unwrap());
    let uri: Uri = "/".parse().unwrap();
    let req = build_upstream_request(&Method::GET, &uri, &headers, "", ()).unwrap();
    assert!(req.headers().get("proxy-connection").is_none());
    assert_eq!(req.headers().get("authorization").unwrap(), "Bearer xyz");
}

#[test]
fn is_hop_by_hop_matches_the_known_set() {
    assert!(is_hop_by_hop(&hyper::header::HeaderName::from_static("keep-alive")));
    assert!(!is_hop_by_hop(&hyper::header::HeaderName::from_static("authorization")));
}
