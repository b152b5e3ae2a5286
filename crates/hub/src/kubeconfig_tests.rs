// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn embeds_the_scoped_cluster_url_and_token() {
    let yaml = build("https://kcp.internal:6443", "root:kedge:users:alice", "my-token", false);
    assert!(yaml.contains("server: \"https://kcp.internal:6443/clusters/root:kedge:users:alice\""));
    assert!(yaml.contains("token: \"my-token\""));
    assert!(yaml.contains("insecure-skip-tls-verify: false"));
}

#[test]
fn dev_mode_skips_tls_verification() {
    let yaml = build("https://kcp.internal:6443", "root:kedge", "tok", true);
    assert!(yaml.contains("insecure-skip-tls-verify: true"));
}

#[test]
fn trims_a_trailing_slash_from_the_base_url() {
    let yaml = build("https://kcp.internal:6443/", "root:kedge", "tok", false);
    assert!(yaml.contains("server: \"https://kcp.internal:6443/clusters/root:kedge\""));
}

#[test]
fn escapes_embedded_quotes_in_the_token() {
    let yaml = build("https://kcp.internal:6443", "root:kedge", "has\"quote", false);
    assert!(yaml.contains("token: \"has\\\"quote\""));
}
