// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Scheduler (C8), Status Aggregator (C9), and Edge Lifecycle + Mount
//! reconcilers (C10): watch-driven loops over `kedge-store`'s
//! `ObjectStore`, each folding events into idempotent desired-state
//! computations rather than reacting to individual events directly.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod aggregate;
pub mod error;
pub mod lifecycle;
pub mod mount;
pub mod placement;
pub mod scheduler;
pub mod selection;

pub use error::SchedulerError;
