// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static-token allow-list, checked by constant-time comparison per the
//! auth-hardness testable property: two tokens of equal length but
//! different values must take indistinguishable time to reject.

use subtle::ConstantTimeEq;

/// Read-only after construction, per the design notes on global mutable
/// state — the allow-list is loaded once at hub startup from
/// `KEDGE_STATIC_TOKENS` and never mutated.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenStore {
    tokens: Vec<String>,
}

impl StaticTokenStore {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Parses a comma-separated list of tokens, as carried in
    /// `KEDGE_STATIC_TOKENS`.
    pub fn from_env_value(value: &str) -> Self {
        Self::new(value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
    }

    /// `true` iff `candidate` constant-time-equals one of the configured
    /// tokens. Every configured token is compared — the loop never
    /// short-circuits on the first non-match — so total running time does
    /// not depend on the candidate's position or match/non-match outcome.
    pub fn contains(&self, candidate: &str) -> bool {
        let mut found = subtle::Choice::from(0u8);
        for token in &self.tokens {
            found |= token.as_bytes().ct_eq(candidate.as_bytes());
        }
        found.into()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
#[path = "static_token_tests.rs"]
mod tests;
