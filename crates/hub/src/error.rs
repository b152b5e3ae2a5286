// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Converts every crate's leaf error type into the §6 JSON error envelope,
//! in one place, so handlers never hand-pick a status code or
//! hand-construct the envelope themselves.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use kedge_core::ErrorClass;
use kedge_wire::Status;

/// Renders `class`/`message` as the §6 JSON error envelope with the
/// matching HTTP status.
pub fn envelope(class: ErrorClass, message: impl Into<String>) -> Response<Full<Bytes>> {
    let status = Status::new(class, message);
    let body = serde_json::to_vec(&status).unwrap_or_else(|_| b"{}".to_vec());
    let code = StatusCode::from_u16(status.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Response::builder()
        .status(code)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| fallback_response(code))
}

fn fallback_response(code: StatusCode) -> Response<Full<Bytes>> {
    Response::builder()
        .status(code)
        .body(Full::new(Bytes::new()))
        .expect("building a header-less response never fails")
}

impl From<kedge_auth::AuthError> for Response<Full<Bytes>> {
    fn from(err: kedge_auth::AuthError) -> Self {
        envelope(err.class(), err.to_string())
    }
}

impl From<kedge_proxy::ProxyError> for Response<Full<Bytes>> {
    fn from(err: kedge_proxy::ProxyError) -> Self {
        envelope(err.class(), err.to_string())
    }
}

impl From<kedge_store::StoreError> for Response<Full<Bytes>> {
    fn from(err: kedge_store::StoreError) -> Self {
        envelope(err.class(), err.to_string())
    }
}

/// Tunnel-registry miss (§7: "Tunnel missing -> 502, caller retries").
pub fn tunnel_missing(cluster: &str, edge: &str) -> Response<Full<Bytes>> {
    envelope(ErrorClass::TunnelMissing, format!("no tunnel registered for edges/{cluster}/{edge}"))
}

pub fn bad_request(message: impl Into<String>) -> Response<Full<Bytes>> {
    envelope(ErrorClass::BadRequest, message)
}

pub fn not_found(message: impl Into<String>) -> Response<Full<Bytes>> {
    envelope(ErrorClass::NotFound, message)
}

pub fn auth_missing(message: impl Into<String>) -> Response<Full<Bytes>> {
    envelope(ErrorClass::AuthMissing, message)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
