// Copyright 2025 QueryBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core data model for QueryBench.
//!
//! This crate holds the leaf types of the benchmarking harness: database
//! targets and the driver registry, execution outcomes, the schedule
//! expansion, and the statistics aggregation. It is deliberately free of any
//! database driver so the model can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Targets, driver kinds, schedule modes, execution outcomes
//! - [`schedule`] - Deterministic expansion of the execution sequence
//! - [`stats`] - Summary statistics and per-query sample accumulation
//! - [`error`] - The crate error type

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod error;
pub mod schedule;
pub mod stats;
pub mod types;

pub use error::{Error, Result};
pub use schedule::build_sequence;
pub use stats::{Stats, StatsCollector};
pub use types::{DatabaseTarget, DriverKind, ExecutionResult, ScheduleMode};
