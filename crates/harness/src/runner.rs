//! Benchmark orchestration across database targets.

use crate::executor::execute;
use crate::report::BenchmarkReport;
use crate::sink::{BenchLog, Severity};
use querybench_core::{build_sequence, DatabaseTarget, ScheduleMode, StatsCollector};
use sqlx::Connection;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that abort a benchmarking invocation.
///
/// Connection failures, preparation failures, and timeouts are contained per
/// target or per run and never surface here; only invalid benchmark input and
/// an unwritable log file do.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The benchmark log could not be appended to.
    #[error("failed to append to benchmark log {path}: {source}")]
    Log {
        /// Log file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The run count or query list cannot produce a sequence.
    #[error(transparent)]
    Invalid(#[from] querybench_core::Error),
}

/// Runs the full benchmark: one pass per target, one report per query.
///
/// Execution is fully sequential. One connection is opened per target and
/// reused for every execution of that target's pass; a target whose
/// connection fails is skipped entirely while the remaining targets still
/// run. There are no retries: each scheduled execution is attempted exactly
/// once.
#[derive(Debug)]
pub struct BenchmarkRunner {
    log: BenchLog,
    timeout: Duration,
    runs: u32,
    mode: ScheduleMode,
}

impl BenchmarkRunner {
    /// Create a runner. The log handle is owned for the whole invocation.
    pub fn new(log: BenchLog, timeout: Duration, runs: u32, mode: ScheduleMode) -> Self {
        Self {
            log,
            timeout,
            runs,
            mode,
        }
    }

    /// Benchmark every query against every target, in order.
    ///
    /// Reports are emitted per original query in input order after a target's
    /// full sequence completes, regardless of schedule mode, and returned for
    /// further processing (e.g. JSON output). Skipped targets contribute no
    /// reports.
    pub async fn run(
        &self,
        targets: &[DatabaseTarget],
        queries: &[String],
    ) -> Result<Vec<BenchmarkReport>, RunnerError> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let mut reports = Vec::new();

        for target in targets {
            self.log(
                Severity::Info,
                format!("===== Benchmarking {} =====", target.name),
            )?;

            let mut conn = match querybench_adapters::open_connection(target).await {
                Ok(conn) => conn,
                Err(err) => {
                    tracing::warn!(db = %target.name, error = %err, "skipping target");
                    self.log(
                        Severity::Severe,
                        format!("[{}] Connection error: {err}", target.name),
                    )?;
                    continue;
                }
            };
            tracing::info!(db = %target.name, "benchmarking");

            let sequence = build_sequence(queries, self.runs, self.mode)?;
            let mut collector = StatsCollector::new(timeout_ms);
            let mut attempts: HashMap<&str, u32> = HashMap::new();

            for sql in &sequence {
                let attempt = attempts
                    .entry(sql.as_str())
                    .and_modify(|a| *a += 1)
                    .or_insert(1);
                let attempt = *attempt;

                match execute(&mut conn, sql, self.timeout).await {
                    Ok(result) => {
                        if result.timed_out {
                            self.log(
                                Severity::Warning,
                                format!(
                                    "[{}] Timeout on run {attempt} after {}s",
                                    target.name,
                                    self.timeout.as_secs()
                                ),
                            )?;
                        }
                        collector.record(sql, &result);
                    }
                    Err(err) => {
                        // Preparation failure: logged and excluded from the
                        // sample sequence, the pass continues.
                        self.log(
                            Severity::Severe,
                            format!("[{}] Error on run {attempt}: {err}", target.name),
                        )?;
                    }
                }
            }

            if let Err(err) = conn.close().await {
                tracing::debug!(db = %target.name, error = %err, "connection close failed");
            }

            for sql in queries {
                let report = BenchmarkReport::new(
                    target.name.clone(),
                    sql.clone(),
                    self.runs,
                    collector.stats_for(sql),
                    collector.rows_for(sql),
                );
                report.append_to(&self.log).map_err(|source| RunnerError::Log {
                    path: self.log.path().to_path_buf(),
                    source,
                })?;
                reports.push(report);
            }
        }

        Ok(reports)
    }

    fn log(&self, severity: Severity, message: String) -> Result<(), RunnerError> {
        self.log
            .append(severity, message)
            .map_err(|source| RunnerError::Log {
                path: self.log.path().to_path_buf(),
                source,
            })
    }
}
