// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The Auth Gate (C4): classifies inbound bearer tokens and performs
//! delegated authorization against the identity/policy backend.

pub mod authorize;
pub mod classify;
pub mod error;
pub mod jwt;
pub mod oidc;
pub mod static_token;

pub use authorize::Authorizer;
pub use classify::classify;
pub use error::AuthError;
pub use kedge_core::TokenClass;
pub use oidc::{ExchangedIdentity, OidcVerifier};
pub use static_token::StaticTokenStore;

pub use openidconnect::Nonce;
