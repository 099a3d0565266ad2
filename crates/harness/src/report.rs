//! Per-query benchmark reports.
//!
//! One [`BenchmarkReport`] is produced per (database, query) pair after a
//! target's full pass completes. Reports are appended to the benchmark log as
//! a block of `INFO` lines and can additionally be written as a combined JSON
//! document.

use crate::sink::{BenchLog, Severity};
use chrono::{DateTime, Utc};
use querybench_core::Stats;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Summary for one query against one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Target name from the configuration.
    pub database: String,
    /// The SQL text that was measured.
    pub query: String,
    /// Configured run count for the pass.
    pub runs: u32,
    /// Derived statistics over the recorded samples.
    pub stats: Stats,
    /// Row count from the first successful run; `None` when every run timed
    /// out or errored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}

impl BenchmarkReport {
    /// Create a report stamped with the current time.
    pub fn new(
        database: impl Into<String>,
        query: impl Into<String>,
        runs: u32,
        stats: Stats,
        rows: Option<u64>,
    ) -> Self {
        Self {
            database: database.into(),
            query: query.into(),
            runs,
            stats,
            rows,
            timestamp: Utc::now(),
        }
    }

    /// Append this report's block to the benchmark log.
    ///
    /// The block lists, in order: SQL text, run count, timeout count, rows
    /// returned (or "N/A"), first/last/min/max run times, average and median
    /// to two decimal places, then a blank separator line.
    pub fn append_to(&self, log: &BenchLog) -> io::Result<()> {
        let db = &self.database;
        log.append(Severity::Info, format!("[{db}] SQL: \"{}\"", self.query))?;
        log.append(Severity::Info, format!("[{db}] Runs: {}", self.runs))?;
        log.append(
            Severity::Info,
            format!("[{db}] Timeouts: {}", self.stats.timeout_count),
        )?;
        let rows = self
            .rows
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        log.append(Severity::Info, format!("[{db}] Rows returned: {rows}"))?;
        log.append(
            Severity::Info,
            format!("[{db}] First run: {}ms", self.stats.first),
        )?;
        log.append(
            Severity::Info,
            format!("[{db}] Last run: {}ms", self.stats.last),
        )?;
        log.append(
            Severity::Info,
            format!("[{db}] Min time: {}ms", self.stats.min),
        )?;
        log.append(
            Severity::Info,
            format!("[{db}] Max time: {}ms", self.stats.max),
        )?;
        log.append(
            Severity::Info,
            format!("[{db}] Avg time: {:.2}ms", self.stats.average),
        )?;
        log.append(
            Severity::Info,
            format!("[{db}] Median: {:.2}ms", self.stats.median),
        )?;
        log.append_raw("")
    }
}

/// Write reports as a pretty-printed JSON document.
pub fn write_reports_json(reports: &[BenchmarkReport], path: impl AsRef<Path>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(reports)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Read reports back from a JSON document.
pub fn read_reports_json(path: impl AsRef<Path>) -> io::Result<Vec<BenchmarkReport>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
