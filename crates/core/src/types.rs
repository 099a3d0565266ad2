// Copyright 2025 QueryBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark target and execution outcome types.
//!
//! A benchmark invocation is described by an ordered list of
//! [`DatabaseTarget`]s, an ordered list of SQL statements, a run count, and a
//! [`ScheduleMode`]. Statements are opaque text: two textually identical
//! statements share one statistic bucket even if they are logically distinct.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered database backend kind.
///
/// Driver identifiers from the configuration resolve to this enum at parse
/// time; an unknown identifier is a fatal configuration error, never a
/// per-target recoverable one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// PostgreSQL.
    Postgres,
    /// MySQL / MariaDB.
    MySql,
    /// SQLite (file-backed or in-memory).
    Sqlite,
}

impl DriverKind {
    /// The URL scheme this backend expects.
    pub fn url_scheme(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }
}

impl TryFrom<&str> for DriverKind {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(Error::UnknownDriver(s.to_string())),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        })
    }
}

/// One benchmarking target: connection info plus a name for log lines.
///
/// Created from static configuration and never mutated; lives for one
/// benchmarking invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseTarget {
    /// Name used to tag every log line for this target.
    pub name: String,
    /// Resolved backend kind.
    pub driver: DriverKind,
    /// Connection URL, without credentials.
    pub url: String,
    /// User name; empty when the backend needs none.
    pub user: String,
    /// Password; empty when the backend needs none.
    pub password: String,
}

impl DatabaseTarget {
    /// Create a new target.
    pub fn new(
        name: impl Into<String>,
        driver: DriverKind,
        url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            driver,
            url: url.into(),
            user: user.into(),
            password: password.into(),
        }
    }
}

/// Ordering policy for repeated runs of different queries.
///
/// The mode determines only execution order; the resulting statistic set is
/// identical either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleMode {
    /// Run query A `runs` times, then query B `runs` times, and so on.
    #[default]
    Sequential,
    /// Interleave: one full pass over the query list, repeated `runs` times.
    RoundRobin,
}

impl TryFrom<&str> for ScheduleMode {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            _ => Err(Error::invalid_input(format!("unknown schedule mode: {s}"))),
        }
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::RoundRobin => "round-robin",
        })
    }
}

/// Outcome of one statement execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Wall-clock time for execution plus full result-set materialization.
    pub elapsed_ms: u64,
    /// Rows drained from the cursor; 0 for a timed-out run.
    pub row_count: u64,
    /// Whether this run was folded into the timeout bucket.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// A run that completed within budget.
    pub fn completed(elapsed_ms: u64, row_count: u64) -> Self {
        Self {
            elapsed_ms,
            row_count,
            timed_out: false,
        }
    }

    /// A run that exceeded its budget or failed after preparation.
    ///
    /// The elapsed time is recorded as the full timeout so the sample sequence
    /// carries the sentinel value the statistics count against the threshold.
    pub fn timed_out(timeout_ms: u64) -> Self {
        Self {
            elapsed_ms: timeout_ms,
            row_count: 0,
            timed_out: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_kind_parsing() {
        assert_eq!(DriverKind::try_from("postgres").unwrap(), DriverKind::Postgres);
        assert_eq!(DriverKind::try_from("PostgreSQL").unwrap(), DriverKind::Postgres);
        assert_eq!(DriverKind::try_from("mysql").unwrap(), DriverKind::MySql);
        assert_eq!(DriverKind::try_from("sqlite3").unwrap(), DriverKind::Sqlite);
    }

    #[test]
    fn test_unknown_driver_is_an_error() {
        let err = DriverKind::try_from("hsqldb").unwrap_err();
        assert!(err.to_string().contains("hsqldb"));
    }

    #[test]
    fn test_schedule_mode_parsing() {
        assert_eq!(
            ScheduleMode::try_from("sequential").unwrap(),
            ScheduleMode::Sequential
        );
        assert_eq!(
            ScheduleMode::try_from("round-robin").unwrap(),
            ScheduleMode::RoundRobin
        );
        assert_eq!(
            ScheduleMode::try_from("round_robin").unwrap(),
            ScheduleMode::RoundRobin
        );
        assert!(ScheduleMode::try_from("shuffled").is_err());
    }

    #[test]
    fn test_schedule_mode_default_is_sequential() {
        assert_eq!(ScheduleMode::default(), ScheduleMode::Sequential);
    }

    #[test]
    fn test_completed_result() {
        let result = ExecutionResult::completed(42, 17);
        assert_eq!(result.elapsed_ms, 42);
        assert_eq!(result.row_count, 17);
        assert!(!result.timed_out);
    }

    #[test]
    fn test_timed_out_result_carries_the_sentinel() {
        let result = ExecutionResult::timed_out(300_000);
        assert_eq!(result.elapsed_ms, 300_000);
        assert_eq!(result.row_count, 0);
        assert!(result.timed_out);
    }

    #[test]
    fn test_target_serialization_roundtrip() {
        let target = DatabaseTarget::new(
            "local",
            DriverKind::Postgres,
            "postgres://localhost:5432/crashdb",
            "bench",
            "secret",
        );
        let json = serde_json::to_string(&target).unwrap();
        let deserialized: DatabaseTarget = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.name, "local");
        assert_eq!(deserialized.driver, DriverKind::Postgres);
    }
}
