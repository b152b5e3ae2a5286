// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use kedge_core::ErrorClass;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer token presented")]
    MissingToken,
    #[error("token did not classify as static, service-account, or OIDC")]
    InvalidToken,
    #[error("token review rejected the token as not authenticated")]
    NotAuthenticated,
    #[error("subject access review denied {verb} on {resource}/{name}")]
    Denied { verb: String, resource: String, name: String },
    #[error("no User record found for this subject")]
    UnknownSubject,
    #[error("identity/policy backend request failed: {0}")]
    Backend(#[from] kube::Error),
    #[error("OIDC provider error: {0}")]
    Oidc(String),
}

impl AuthError {
    /// Maps this error onto the fixed HTTP status table from the
    /// error-handling design (auth missing/invalid -> 401, denied -> 403,
    /// everything else talking to an external collaborator -> 502).
    pub fn class(&self) -> ErrorClass {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::NotAuthenticated => {
                ErrorClass::AuthMissing
            }
            AuthError::Denied { .. } | AuthError::UnknownSubject => ErrorClass::AuthDenied,
            AuthError::Backend(_) | AuthError::Oidc(_) => ErrorClass::UpstreamIo,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
