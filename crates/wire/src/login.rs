// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `LoginResponse` — returned base64-encoded in the `?response=` query
//! parameter of the OIDC callback redirect, and directly as the body of
//! `/auth/token-login`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Raw kubeconfig bytes, base64-encoded by serde as a `String` field.
    pub kubeconfig: String,
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub user_id: String,
    pub id_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub issuer_url: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl LoginResponse {
    /// Encodes this response as the base64 payload carried in the
    /// `?response=` redirect query parameter.
    pub fn to_base64_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(base64::Engine::encode(&base64::engine::general_purpose::STANDARD, json))
    }
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
