// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/healthz`, `/readyz` — always 200 "ok" (§6).

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

fn ok() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(Bytes::from_static(b"ok")))
        .expect("building a static 200 response never fails")
}

pub fn healthz() -> Response<Full<Bytes>> {
    ok()
}

pub fn readyz() -> Response<Full<Bytes>> {
    ok()
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
