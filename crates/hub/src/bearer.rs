// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extracts the bearer token every authenticated handler (C3, C5) needs
//! before it can call `kedge_auth::classify`.

use hyper::HeaderMap;

/// Returns the token carried by `Authorization: Bearer <token>`, or `None`
/// if the header is absent, malformed, or uses a different scheme.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(hyper::header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "bearer_tests.rs"]
mod tests;
