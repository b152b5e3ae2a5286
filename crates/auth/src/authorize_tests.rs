// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn token_review_carries_the_bearer_token() {
    let tr = build_token_review("sa-token-abc");
    assert_eq!(tr.spec.token.as_deref(), Some("sa-token-abc"));
}

#[test]
fn subject_access_review_carries_cluster_verb_resource_name() {
    let sar = build_subject_access_review("alice", "root:kedge:users:alice", "get", "edges", "edgeA");
    assert_eq!(sar.spec.user.as_deref(), Some("alice"));
    let attrs = sar.spec.resource_attributes.expect("resource attributes set");
    assert_eq!(attrs.namespace.as_deref(), Some("root:kedge:users:alice"));
    assert_eq!(attrs.verb.as_deref(), Some("get"));
    assert_eq!(attrs.resource.as_deref(), Some("edges"));
    assert_eq!(attrs.name.as_deref(), Some("edgeA"));
    assert_eq!(attrs.group.as_deref(), Some("kedge.faros.sh"));
}
