// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OIDC ID-token verification. The hub never runs its own identity
//! provider (out of scope per §1); this module only verifies signature +
//! issuer of a bearer token presented directly as an ID token, using a
//! cached provider object built once at startup from discovery.

use std::str::FromStr;

use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreIdToken, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, RedirectUrl, Scope, TokenResponse,
    Url,
};

use kedge_core::OidcClaims;

use crate::error::AuthError;

/// Claims plus the handful of token-response fields the browser login flow
/// (`kedge-hub`'s `/auth/callback`) needs to build a `LoginResponse`.
pub struct ExchangedIdentity {
    pub claims: OidcClaims,
    pub raw_id_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<std::time::Duration>,
}

/// Wraps a discovered `CoreClient`, read-only after construction per the
/// design notes on immutable-after-startup global state.
pub struct OidcVerifier {
    client: CoreClient,
    http_client: reqwest::Client,
}

impl OidcVerifier {
    /// Performs OIDC discovery against `issuer_url` once, at hub startup.
    /// `dev_mode` permits skipping TLS verification on the discovery and
    /// JWKS-fetch HTTP client — never enabled by default.
    pub async fn discover(
        issuer_url: &str,
        client_id: &str,
        client_secret: Option<&str>,
        dev_mode: bool,
    ) -> Result<Self, AuthError> {
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .danger_accept_invalid_certs(dev_mode)
            .build()
            .map_err(|e| AuthError::Oidc(format!("building discovery http client: {e}")))?;

        let issuer = IssuerUrl::new(issuer_url.to_string())
            .map_err(|e| AuthError::Oidc(format!("invalid issuer url: {e}")))?;

        let metadata = CoreProviderMetadata::discover_async(issuer, &http_client)
            .await
            .map_err(|e| AuthError::Oidc(format!("discovery failed: {e}")))?;

        let client = CoreClient::from_provider_metadata(
            metadata,
            ClientId::new(client_id.to_string()),
            client_secret.map(|s| ClientSecret::new(s.to_string())),
        );

        Ok(Self { client, http_client })
    }

    /// Verifies `raw_token`'s signature and issuer against the discovered
    /// provider and returns its claims. No nonce is checked: this token
    /// was presented standalone as a bearer credential, not returned from
    /// an authorization-code exchange the hub itself initiated.
    pub fn verify(&self, raw_token: &str) -> Result<OidcClaims, AuthError> {
        let id_token = parse_id_token(raw_token)?;

        let verifier = self.client.id_token_verifier();
        let claims = id_token
            .claims(&verifier, |_nonce: Option<&Nonce>| Ok(()))
            .map_err(|e| AuthError::Oidc(format!("id token verification failed: {e}")))?;

        Ok(OidcClaims {
            issuer: claims.issuer().as_str().to_string(),
            subject: claims.subject().as_str().to_string(),
            email: claims.email().map(|e| e.as_str().to_string()),
        })
    }

    /// Builds the IdP authorization-code redirect URL for `/auth/authorize`
    /// (§6). `state` is the caller's opaque, round-tripped value (here: the
    /// base64 blob carrying the CLI's localhost callback); `nonce` is
    /// likewise round-tripped through the IdP rather than held server-side,
    /// since the hub keeps no per-login session state between the redirect
    /// and the callback.
    pub fn authorize_url(&self, redirect_uri: &str, state: String, nonce: Nonce) -> Result<Url, AuthError> {
        let redirect = RedirectUrl::new(redirect_uri.to_string())
            .map_err(|e| AuthError::Oidc(format!("invalid redirect uri: {e}")))?;

        let (url, _csrf, _nonce) = self
            .client
            .clone()
            .set_redirect_uri(redirect)
            .authorize_url(CoreAuthenticationFlow::AuthorizationCode, move || CsrfToken::new(state.clone()), move || nonce)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .url();
        Ok(url)
    }

    /// Exchanges an authorization `code` from `/auth/callback` for an ID
    /// token, verifying it the same way [`Self::verify`] does.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<ExchangedIdentity, AuthError> {
        let redirect = RedirectUrl::new(redirect_uri.to_string())
            .map_err(|e| AuthError::Oidc(format!("invalid redirect uri: {e}")))?;

        let token_response = self
            .client
            .clone()
            .set_redirect_uri(redirect)
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AuthError::Oidc(format!("building code exchange request: {e}")))?
            .request_async(&self.http_client)
            .await
            .map_err(|e| AuthError::Oidc(format!("code exchange failed: {e}")))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| AuthError::Oidc("token response carried no id_token".to_string()))?;

        let verifier = self.client.id_token_verifier();
        let claims = id_token
            .claims(&verifier, |_nonce: Option<&Nonce>| Ok(()))
            .map_err(|e| AuthError::Oidc(format!("id token verification failed: {e}")))?;

        Ok(ExchangedIdentity {
            claims: OidcClaims {
                issuer: claims.issuer().as_str().to_string(),
                subject: claims.subject().as_str().to_string(),
                email: claims.email().map(|e| e.as_str().to_string()),
            },
            raw_id_token: id_token.to_string(),
            refresh_token: token_response.refresh_token().map(|t| t.secret().clone()),
            expires_in: token_response.expires_in(),
        })
    }
}

/// Parses the raw bearer string into a `CoreIdToken` structure without
/// verifying its signature. Split out from [`OidcVerifier::verify`] so the
/// "is this even JWT-shaped" check is testable without network access to a
/// real provider.
fn parse_id_token(raw_token: &str) -> Result<CoreIdToken, AuthError> {
    CoreIdToken::from_str(raw_token).map_err(|e| AuthError::Oidc(format!("malformed id token: {e}")))
}

#[cfg(test)]
#[path = "oidc_tests.rs"]
mod tests;
