//! Benchmarking harness for QueryBench.
//!
//! This crate runs the measurement itself: it executes each scheduled
//! statement against an open connection under a deadline, accumulates the
//! per-query samples, and appends the per-query report blocks to the
//! benchmark log.
//!
//! # Quick Start
//!
//! ```no_run
//! use querybench_core::{DatabaseTarget, DriverKind, ScheduleMode};
//! use querybench_harness::{BenchLog, BenchmarkRunner};
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let targets = vec![DatabaseTarget::new(
//!     "local",
//!     DriverKind::Sqlite,
//!     "sqlite:crashdb.sqlite",
//!     "",
//!     "",
//! )];
//! let queries = vec!["SELECT * FROM crash_data".to_string()];
//!
//! let runner = BenchmarkRunner::new(
//!     BenchLog::new("benchmark.log"),
//!     Duration::from_secs(300),
//!     5,
//!     ScheduleMode::Sequential,
//! );
//! let reports = runner.run(&targets, &queries).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`executor`] - One statement execution under a deadline
//! - [`runner`] - Orchestration across targets and the execution sequence
//! - [`report`] - Per-query report blocks and JSON output
//! - [`sink`] - The append-only log sink

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod executor;
pub mod report;
pub mod runner;
pub mod sink;

pub use executor::{execute, PrepareError};
pub use report::{read_reports_json, write_reports_json, BenchmarkReport};
pub use runner::{BenchmarkRunner, RunnerError};
pub use sink::{BenchLog, Severity};
