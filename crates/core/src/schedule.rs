// Copyright 2025 QueryBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Deterministic expansion of the execution sequence.

use crate::error::Error;
use crate::types::ScheduleMode;

/// Expand a query list into the ordered sequence of executions.
///
/// The output length is always `queries.len() * runs`. Sequential mode fully
/// consumes one query before moving to the next; round-robin repeats full
/// passes over the list. The output is a pure function of the inputs; there
/// is no randomness.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for `runs == 0` or an empty query list;
/// callers should validate configuration rather than expect a partial
/// sequence.
pub fn build_sequence(
    queries: &[String],
    runs: u32,
    mode: ScheduleMode,
) -> crate::Result<Vec<String>> {
    if runs == 0 {
        return Err(Error::invalid_input("run count must be positive"));
    }
    if queries.is_empty() {
        return Err(Error::invalid_input("query list must not be empty"));
    }

    let mut sequence = Vec::with_capacity(queries.len() * runs as usize);
    match mode {
        ScheduleMode::Sequential => {
            for query in queries {
                for _ in 0..runs {
                    sequence.push(query.clone());
                }
            }
        }
        ScheduleMode::RoundRobin => {
            for _ in 0..runs {
                sequence.extend(queries.iter().cloned());
            }
        }
    }
    Ok(sequence)
}
