// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`classify`] computes a [`TokenClass`] once per request, per the design
//! notes' replacement for dynamic dispatch on "any bearer token". Every
//! downstream branch (agent-proxy, edges-proxy) is then driven by the
//! returned variant and never re-inspects the raw token.

use kedge_core::TokenClass;

use crate::jwt::classify_service_account;
use crate::oidc::OidcVerifier;
use crate::static_token::StaticTokenStore;

/// Classifies `token` in the fixed precedence order from the
/// classification table: static allow-list first (cheapest, no I/O),
/// then service-account JWT shape, then OIDC signature verification.
/// `oidc` is `None` when no OIDC provider is configured, in which case
/// that branch is skipped and falls through to `Invalid`.
pub fn classify(token: &str, static_tokens: &StaticTokenStore, oidc: Option<&OidcVerifier>) -> TokenClass {
    if static_tokens.contains(token) {
        return TokenClass::Static;
    }

    if let Some(claims) = classify_service_account(token) {
        return TokenClass::ServiceAccount(claims);
    }

    if let Some(verifier) = oidc {
        if let Ok(claims) = verifier.verify(token) {
            return TokenClass::Oidc(claims);
        }
    }

    TokenClass::Invalid
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
