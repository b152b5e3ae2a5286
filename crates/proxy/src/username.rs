// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSH username selection + sanitisation (§4.7 step 3). Selection order:
//! explicit `status.sshCredentials.username`, then the OIDC email
//! local-part, then a sanitised OIDC `sub`, then `"root"`.

/// Runs the full selection order, sanitising whichever candidate wins.
pub fn select_username(
    explicit: Option<&str>,
    oidc_email: Option<&str>,
    oidc_sub: Option<&str>,
) -> String {
    if let Some(name) = explicit.filter(|s| !s.is_empty()) {
        return sanitise(name);
    }
    if let Some(local) = oidc_email.and_then(email_local_part) {
        return sanitise(local);
    }
    if let Some(sub) = oidc_sub.filter(|s| !s.is_empty()) {
        return sanitise(sub);
    }
    "root".to_string()
}

/// The local part of an email address (everything before the first `@`).
fn email_local_part(email: &str) -> Option<&str> {
    email.split_once('@').map(|(local, _)| local).filter(|s| !s.is_empty())
}

/// Lowercases, keeps `[a-z0-9_-]`, maps everything else to `_`, truncates
/// to 32 bytes, and falls back to `"root"` if the result is empty.
fn sanitise(raw: &str) -> String {
    let mapped: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    let truncated: String = mapped.chars().take(32).collect();
    if truncated.is_empty() {
        "root".to_string()
    } else {
        truncated
    }
}

#[cfg(test)]
#[path = "username_tests.rs"]
mod tests;
