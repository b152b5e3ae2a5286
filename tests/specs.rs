// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-crate integration tests for the §8 testable properties and
//! end-to-end scenarios that span more than one crate. Properties local
//! to a single component (constant-time token comparison, registry
//! exclusivity in isolation, mux dial/done semantics) already have unit
//! tests next to their implementation; this suite wires real crates
//! together the way `kedge-hub` does at request time, without a live
//! Kubernetes-shaped backend.

mod tunnel_registry_pickup;
mod scheduler_convergence;
mod heartbeat_and_aggregate;
