// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delegated authorization: TokenReview (identity) followed by
//! SubjectAccessReview (policy), against the configured identity/policy
//! backend. Used by both the agent-proxy's service-account path and the
//! edges-proxy's `authorize(token, cluster, verb, resource, name)`
//! primitive.

use k8s_openapi::api::authentication::v1::{TokenReview, TokenReviewSpec, TokenReviewStatus};
use k8s_openapi::api::authorization::v1::{
    ResourceAttributes, SubjectAccessReview, SubjectAccessReviewSpec,
};
use kube::api::{Api, PostParams};
use kube::Client;

use crate::error::AuthError;

/// Delegates TokenReview + SubjectAccessReview calls to whatever cluster
/// the hub is configured against (kcp's front-proxy in production, a
/// plain kube-apiserver in dev/test).
#[derive(Clone)]
pub struct Authorizer {
    client: Client,
}

impl Authorizer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Verifies `token` identifies a real principal (TokenReview), then
    /// that the principal may `verb` on `resource/name` (SubjectAccessReview).
    /// Any authentication failure reported by TokenReview surfaces as
    /// [`AuthError::NotAuthenticated`]; a denied SubjectAccessReview as
    /// [`AuthError::Denied`]. Transport failures talking to the backend
    /// surface as [`AuthError::Backend`] (502 per the error table).
    pub async fn authorize(
        &self,
        token: &str,
        cluster: &str,
        verb: &str,
        resource: &str,
        name: &str,
    ) -> Result<String, AuthError> {
        let username = self.review_token(token).await?;

        let reviews: Api<SubjectAccessReview> = Api::all(self.client.clone());
        let sar = build_subject_access_review(&username, cluster, verb, resource, name);

        let result = reviews.create(&PostParams::default(), &sar).await?;
        let allowed = result.status.map(|s| s.allowed).unwrap_or(false);
        if !allowed {
            return Err(AuthError::Denied {
                verb: verb.to_string(),
                resource: resource.to_string(),
                name: name.to_string(),
            });
        }

        Ok(username)
    }

    /// Runs TokenReview alone, returning the authenticated username.
    /// Exposed separately so callers that only need identity (not a
    /// specific permission) don't pay for a SubjectAccessReview round
    /// trip they don't need.
    pub async fn review_token(&self, token: &str) -> Result<String, AuthError> {
        let reviews: Api<TokenReview> = Api::all(self.client.clone());
        let tr = build_token_review(token);

        let result = reviews.create(&PostParams::default(), &tr).await?;
        match result.status {
            Some(TokenReviewStatus { authenticated: Some(true), user: Some(user), .. }) => {
                Ok(user.username.unwrap_or_default())
            }
            _ => Err(AuthError::NotAuthenticated),
        }
    }
}

fn build_token_review(token: &str) -> TokenReview {
    TokenReview {
        spec: TokenReviewSpec { token: Some(token.to_string()), ..Default::default() },
        status: None,
        ..Default::default()
    }
}

fn build_subject_access_review(
    username: &str,
    cluster: &str,
    verb: &str,
    resource: &str,
    name: &str,
) -> SubjectAccessReview {
    SubjectAccessReview {
        spec: SubjectAccessReviewSpec {
            user: Some(username.to_string()),
            resource_attributes: Some(ResourceAttributes {
                namespace: Some(cluster.to_string()),
                verb: Some(verb.to_string()),
                resource: Some(resource.to_string()),
                name: Some(name.to_string()),
                group: Some("kedge.faros.sh".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "authorize_tests.rs"]
mod tests;
