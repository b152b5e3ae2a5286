// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The OIDC browser login flow and the static-token login endpoint (§6):
//! `/auth/authorize`, `/auth/callback`, `/auth/token-login`.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use kube::api::{Api, PostParams};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use kedge_auth::Nonce;
use kedge_core::{subject_label_value, OidcClaims, TokenClass, User, UserSpec, SUBJECT_LABEL};
use kedge_wire::LoginResponse;

use crate::error;
use crate::kubeconfig;
use crate::routing::query_param;
use crate::state::AppState;

/// Logical cluster static-token logins are scoped to — static tokens are
/// the implicit, unscoped administrative identity (§4.4), not a user's own
/// `defaultCluster`.
const ROOT_CLUSTER: &str = "root:kedge";

/// Round-tripped through the IdP's `state` parameter — the hub keeps no
/// server-side session between the `/auth/authorize` redirect and the
/// `/auth/callback` it eventually receives for it (§9 design notes).
#[derive(Serialize, Deserialize)]
struct LoginState {
    redirect: String,
    nonce: String,
}

fn encode_state(state: &LoginState) -> Result<String, serde_json::Error> {
    Ok(BASE64.encode(serde_json::to_vec(state)?))
}

fn decode_state(raw: &str) -> Result<LoginState, String> {
    let bytes = BASE64.decode(raw).map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

/// `/auth/authorize?p=<port>&s=<sid>`: starts the OIDC browser flow by
/// redirecting to the IdP with a state blob carrying the CLI's localhost
/// callback and a fresh nonce.
pub async fn authorize(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let Some(oidc) = state.oidc.as_ref() else {
        return error::bad_request("OIDC login is not configured on this hub");
    };

    let query = req.uri().query().unwrap_or("");
    let Some(port) = query_param(query, "p") else {
        return error::bad_request("missing ?p= callback port");
    };
    let Some(sid) = query_param(query, "s") else {
        return error::bad_request("missing ?s= session id");
    };

    let mut nonce_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce_value = BASE64.encode(nonce_bytes);

    let login_state = LoginState {
        redirect: format!("http://127.0.0.1:{port}/callback?sid={sid}"),
        nonce: nonce_value.clone(),
    };
    let encoded_state = match encode_state(&login_state) {
        Ok(encoded) => encoded,
        Err(err) => return error::bad_request(format!("failed to encode login state: {err}")),
    };

    let callback_uri = format!("{}/auth/callback", state.external_url.trim_end_matches('/'));
    let url = match oidc.authorize_url(&callback_uri, encoded_state, Nonce::new(nonce_value)) {
        Ok(url) => url,
        Err(err) => return err.into(),
    };

    redirect_to(url.as_str())
}

/// `/auth/callback?code=…&state=…`: exchanges the authorization code,
/// upserts the `User`, and 302-redirects back to the CLI's localhost
/// callback with the `LoginResponse` in `?response=`.
pub async fn callback(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let Some(oidc) = state.oidc.as_ref() else {
        return error::bad_request("OIDC login is not configured on this hub");
    };

    let query = req.uri().query().unwrap_or("").to_string();
    let Some(code) = query_param(&query, "code") else {
        return error::bad_request("missing ?code=");
    };
    let Some(raw_state) = query_param(&query, "state") else {
        return error::bad_request("missing ?state=");
    };
    let login_state = match decode_state(raw_state) {
        Ok(login_state) => login_state,
        Err(err) => return error::bad_request(format!("malformed state: {err}")),
    };

    let callback_uri = format!("{}/auth/callback", state.external_url.trim_end_matches('/'));
    let identity = match oidc.exchange_code(code, &callback_uri).await {
        Ok(identity) => identity,
        Err(err) => return err.into(),
    };

    let user = match upsert_user(&state, &identity.claims).await {
        Ok(user) => user,
        Err(err) => return err.into(),
    };

    let expires_at = identity
        .expires_in
        .and_then(|d| SystemTime::now().checked_add(d))
        .unwrap_or_else(SystemTime::now)
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    let kubeconfig_yaml = kubeconfig::build(
        &state.base_kube_config.cluster_url.to_string(),
        &user.spec.default_cluster,
        &identity.raw_id_token,
        state.dev_mode,
    );

    let login_response = LoginResponse {
        kubeconfig: BASE64.encode(kubeconfig_yaml),
        expires_at,
        email: identity.claims.email.clone(),
        user_id: subject_label_value(&identity.claims.issuer, &identity.claims.subject),
        id_token: identity.raw_id_token,
        refresh_token: identity.refresh_token,
        issuer_url: identity.claims.issuer,
        client_id: state.oidc_client_id.clone(),
        client_secret: state.oidc_client_secret.clone(),
    };

    let encoded = match login_response.to_base64_json() {
        Ok(encoded) => encoded,
        Err(err) => return error::bad_request(format!("failed to encode login response: {err}")),
    };

    let mut redirect_url = match url::Url::parse(&login_state.redirect) {
        Ok(url) => url,
        Err(err) => return error::bad_request(format!("malformed redirect target: {err}")),
    };
    redirect_url.query_pairs_mut().append_pair("response", &encoded);

    redirect_to(redirect_url.as_str())
}

/// Looks up the `User` labelled with this subject's derived hash, creating
/// one (with a freshly allocated `defaultCluster`) on first login.
async fn upsert_user(state: &AppState, claims: &OidcClaims) -> Result<User, kedge_store::StoreError> {
    let label = subject_label_value(&claims.issuer, &claims.subject);
    let users: Api<User> = state.system_store.cluster_scoped();

    let existing = state.system_store.list(&users).await?;
    if let Some(user) = existing
        .into_iter()
        .find(|u| u.metadata.labels.as_ref().and_then(|l| l.get(SUBJECT_LABEL)).map(String::as_str) == Some(label.as_str()))
    {
        return Ok(user);
    }

    let mut user = User::new(
        &label,
        UserSpec {
            issuer: claims.issuer.clone(),
            oidc_sub: claims.subject.clone(),
            email: claims.email.clone(),
            default_cluster: format!("root:kedge:users:{label}"),
        },
    );
    user.metadata.labels = Some([(SUBJECT_LABEL.to_string(), label)].into_iter().collect());

    users.create(&PostParams::default(), &user).await.map_err(kedge_store::StoreError::Backend)
}

#[derive(Deserialize)]
struct TokenLoginRequest {
    token: String,
}

/// `/auth/token-login` (POST): static-token login, returning a
/// `LoginResponse` with kubeconfig directly as the response body.
pub async fn token_login(state: Arc<AppState>, req: Request<Incoming>) -> Response<Full<Bytes>> {
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => return error::bad_request(format!("failed to read request body: {err}")),
    };
    let login_request: TokenLoginRequest = match serde_json::from_slice(&body) {
        Ok(login_request) => login_request,
        Err(err) => return error::bad_request(format!("malformed request body: {err}")),
    };

    let class = kedge_auth::classify(&login_request.token, &state.static_tokens, state.oidc.as_ref());
    if !matches!(class, TokenClass::Static) {
        return error::auth_missing("token-login requires a static token");
    }

    let kubeconfig_yaml =
        kubeconfig::build(&state.base_kube_config.cluster_url.to_string(), ROOT_CLUSTER, &login_request.token, state.dev_mode);

    // Static tokens carry no provider-issued expiry; a year out is a
    // generous, clearly-labelled placeholder rather than a fabricated one.
    let expires_at = SystemTime::now()
        .checked_add(Duration::from_secs(365 * 24 * 3600))
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    let login_response = LoginResponse {
        kubeconfig: BASE64.encode(kubeconfig_yaml),
        expires_at,
        email: None,
        user_id: "static".to_string(),
        id_token: login_request.token,
        refresh_token: None,
        issuer_url: String::new(),
        client_id: String::new(),
        client_secret: None,
    };

    let body = match serde_json::to_vec(&login_response) {
        Ok(body) => body,
        Err(err) => return error::bad_request(format!("failed to encode login response: {err}")),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| error::bad_request("failed to build response"))
}

fn redirect_to(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(hyper::header::LOCATION, location)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| error::bad_request("failed to build redirect"))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
