// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn ssh_port_defaults_to_22() {
    let spec = EdgeSpec {
        edge_type: EdgeType::Server,
        ssh_port: None,
        private_key_secret_ref: None,
    };
    assert_eq!(spec.ssh_port(), 22);
}

#[test]
fn ssh_port_honors_explicit_value() {
    let spec = EdgeSpec {
        edge_type: EdgeType::Server,
        ssh_port: Some(2222),
        private_key_secret_ref: None,
    };
    assert_eq!(spec.ssh_port(), 2222);
}

#[test]
fn edge_type_displays_lowercase() {
    assert_eq!(EdgeType::Kubernetes.to_string(), "kubernetes");
    assert_eq!(EdgeType::Server.to_string(), "server");
}

#[test]
fn type_locked_only_once_ready() {
    let mut edge = Edge::new(
        "bastion",
        EdgeSpec {
            edge_type: EdgeType::Server,
            ssh_port: None,
            private_key_secret_ref: None,
        },
    );
    assert!(!edge.type_locked());

    edge.status = Some(EdgeStatus {
        phase: EdgePhase::Scheduling,
        ..Default::default()
    });
    assert!(!edge.type_locked());

    edge.status = Some(EdgeStatus {
        phase: EdgePhase::Ready,
        connected: true,
        ..Default::default()
    });
    assert!(edge.type_locked());
}
