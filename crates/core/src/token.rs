// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`TokenClass`] — the tagged variant the design notes call for in place
//! of dynamic dispatch on "any bearer token". `kedge-auth` computes one of
//! these per request; every downstream branch is driven by the variant,
//! never by re-inspecting the raw token.

use std::fmt;

/// A service-account JWT's unverified payload, enough of it to classify
/// the token before TokenReview is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountClaims {
    pub cluster_name: String,
}

/// An OIDC ID token's verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcClaims {
    pub issuer: String,
    pub subject: String,
    pub email: Option<String>,
}

/// The classification of an inbound bearer token, computed once per
/// request by `kedge_auth::classify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// Matched the configured static allow-list by constant-time compare.
    Static,
    /// Three-segment JWT with `iss == "kubernetes/serviceaccount"` and a
    /// non-empty `clusterName` claim. Not yet authorized — that happens
    /// via TokenReview + SubjectAccessReview.
    ServiceAccount(ServiceAccountClaims),
    /// Verified against the configured OIDC provider.
    Oidc(OidcClaims),
    /// Anything else: malformed, wrong issuer, signature failure.
    Invalid,
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Static => f.write_str("static"),
            TokenClass::ServiceAccount(_) => f.write_str("service-account"),
            TokenClass::Oidc(_) => f.write_str("oidc"),
            TokenClass::Invalid => f.write_str("invalid"),
        }
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
