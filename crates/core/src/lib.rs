// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! kedge-core: domain types, shared error classification, and the clock
//! abstraction used across the hub's crates. No I/O lives here.

pub mod macros;

pub mod clock;
pub mod cluster;
pub mod edge;
pub mod error;
pub mod heartbeat;
pub mod placement;
pub mod token;
pub mod user;
pub mod workload;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

pub use clock::{Clock, FakeClock, SystemClock};
pub use cluster::LogicalCluster;
pub use edge::{Edge, EdgePhase, EdgeSpec, EdgeStatus, EdgeType, SshCredentials};
pub use error::ErrorClass;
pub use placement::{Placement, PlacementSpec, PlacementStatus, WORKLOAD_LABEL};
pub use token::{OidcClaims, ServiceAccountClaims, TokenClass};
pub use user::{subject_label_value, User, UserSpec, UserStatus, SUBJECT_LABEL};
pub use workload::{
    EdgeBreakdown, PlacementStrategy, VirtualWorkload, VirtualWorkloadSpec, VirtualWorkloadStatus,
    WorkloadPhase, WorkloadPlacementSpec, WorkloadTemplate,
};
