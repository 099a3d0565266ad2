// Copyright 2025 QueryBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Summary statistics over elapsed-time samples.
//!
//! [`Stats`] is a pure function of an ordered sample sequence and a timeout
//! threshold. [`StatsCollector`] accumulates samples per distinct query text
//! across a benchmarking pass and derives [`Stats`] on demand.

use crate::types::ExecutionResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of one query's elapsed-time samples, in milliseconds.
///
/// `first` and `last` come from occurrence order; `min`, `max` and `median`
/// from a sorted copy. The standard deviation is the population standard
/// deviation (divisor = n). Every field is exactly 0 for an empty sample
/// sequence; that is a defined degenerate case, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Elapsed time of the first executed run.
    pub first: u64,
    /// Elapsed time of the final run.
    pub last: u64,
    /// Smallest sample.
    pub min: u64,
    /// Largest sample.
    pub max: u64,
    /// Arithmetic mean.
    pub average: f64,
    /// Midpoint of the sorted samples; mean of the two central values for an
    /// even count.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Samples at or above the timeout threshold. True timeouts are encoded
    /// as exactly the threshold value, so they are always counted here.
    pub timeout_count: usize,
}

impl Stats {
    /// Compute statistics from an ordered sample sequence.
    pub fn from_samples(samples: &[u64], timeout_threshold_ms: u64) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        let n = sorted.len();

        let average = samples.iter().map(|&v| v as f64).sum::<f64>() / n as f64;

        let median = if n % 2 == 1 {
            sorted[n / 2] as f64
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
        };

        let std_dev = (samples
            .iter()
            .map(|&v| {
                let d = v as f64 - average;
                d * d
            })
            .sum::<f64>()
            / n as f64)
            .sqrt();

        let timeout_count = samples
            .iter()
            .filter(|&&v| v >= timeout_threshold_ms)
            .count();

        Self {
            first: samples[0],
            last: samples[n - 1],
            min: sorted[0],
            max: sorted[n - 1],
            average,
            median,
            std_dev,
            timeout_count,
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    samples: Vec<u64>,
    rows: Option<u64>,
}

/// Accumulates execution results per distinct query text.
///
/// Samples are appended in call order; the row count is stored the first time
/// a non-timeout result is recorded for a query and never overwritten, since
/// row counts are assumed constant across repeated runs of the same read-only
/// statement.
#[derive(Debug)]
pub struct StatsCollector {
    timeout_threshold_ms: u64,
    buckets: HashMap<String, Bucket>,
}

impl StatsCollector {
    /// Create a collector with the threshold used for timeout counting.
    pub fn new(timeout_threshold_ms: u64) -> Self {
        Self {
            timeout_threshold_ms,
            buckets: HashMap::new(),
        }
    }

    /// Append one result to the query's sample sequence.
    pub fn record(&mut self, query: &str, result: &ExecutionResult) {
        let bucket = self.buckets.entry(query.to_owned()).or_default();
        bucket.samples.push(result.elapsed_ms);
        if !result.timed_out && bucket.rows.is_none() {
            bucket.rows = Some(result.row_count);
        }
    }

    /// Compute statistics for a query, fresh on every call.
    pub fn stats_for(&self, query: &str) -> Stats {
        let samples = self
            .buckets
            .get(query)
            .map(|b| b.samples.as_slice())
            .unwrap_or(&[]);
        Stats::from_samples(samples, self.timeout_threshold_ms)
    }

    /// Row count from the first successful run, if any run succeeded.
    pub fn rows_for(&self, query: &str) -> Option<u64> {
        self.buckets.get(query).and_then(|b| b.rows)
    }

    /// Number of samples recorded for a query.
    pub fn sample_count(&self, query: &str) -> usize {
        self.buckets.get(query).map(|b| b.samples.len()).unwrap_or(0)
    }
}
