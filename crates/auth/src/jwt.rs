// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service-account JWT classification: decode the *unverified* payload
//! segment far enough to tell a service-account token apart from an OIDC
//! ID token, per the classification table. Authentication itself happens
//! later, via TokenReview ([`crate::authorize`]) — this module never
//! trusts the claims it reads.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use kedge_core::ServiceAccountClaims;
use serde::Deserialize;

const KUBERNETES_SERVICEACCOUNT_ISSUER: &str = "kubernetes/serviceaccount";

#[derive(Deserialize)]
struct UnverifiedPayload {
    #[serde(default)]
    iss: String,
    #[serde(default, rename = "clusterName")]
    cluster_name: String,
}

/// `true` iff `token` is a well-formed 3-segment JWT, i.e. has exactly two
/// `.` separators. Segment *contents* are not validated here.
pub fn looks_like_jwt(token: &str) -> bool {
    token.split('.').count() == 3
}

/// Decodes the unverified payload segment of a 3-segment JWT and
/// classifies it as a service-account token if `iss ==
/// "kubernetes/serviceaccount"` and `clusterName` is non-empty.
///
/// Returns `None` for anything that isn't a well-formed JWT, doesn't
/// base64-decode, isn't a JSON object, or doesn't match the
/// service-account shape — callers fall through to OIDC classification.
pub fn classify_service_account(token: &str) -> Option<ServiceAccountClaims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload_segment = segments.next()?;
    if segments.next().is_none() {
        return None;
    }

    let payload_bytes = URL_SAFE_NO_PAD.decode(payload_segment).ok()?;
    let payload: UnverifiedPayload = serde_json::from_slice(&payload_bytes).ok()?;

    if payload.iss != KUBERNETES_SERVICEACCOUNT_ISSUER || payload.cluster_name.is_empty() {
        return None;
    }

    Some(ServiceAccountClaims { cluster_name: payload.cluster_name })
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
