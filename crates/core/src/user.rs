// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `User` — a cluster-scoped record the OIDC path of the auth gate upserts
//! on first login and later looks up by a derived label, since OIDC
//! `issuer`/`sub` pairs are arbitrary strings and not safe label values.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Label key carrying the derived subject hash.
pub const SUBJECT_LABEL: &str = "kedge.faros.sh/sub";

/// Computes the `sub=H` label value: the first 63 hex characters of
/// `SHA-256(issuer || "/" || oidc_sub)`. 63 is the longest prefix of a
/// 64-char hex digest that still fits a Kubernetes label value.
pub fn subject_label_value(issuer: &str, oidc_sub: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(issuer.as_bytes());
    hasher.update(b"/");
    hasher.update(oidc_sub.as_bytes());
    let digest = hasher.finalize();
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    hex[..63].to_string()
}

#[derive(Debug, Clone, CustomResource, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "kedge.faros.sh",
    version = "v1alpha1",
    kind = "User",
    plural = "users",
    status = "UserStatus",
    derive = "Default"
)]
pub struct UserSpec {
    pub issuer: String,
    pub oidc_sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Logical cluster path (`/clusters/{path}`) granted to this user.
    pub default_cluster: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserStatus {}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
