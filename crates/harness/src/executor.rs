//! Single-statement execution under a deadline.

use futures::TryStreamExt;
use querybench_core::ExecutionResult;
use sqlx::any::AnyStatement;
use sqlx::{AnyConnection, Executor, Statement};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Statement preparation failed before execution started.
///
/// Unlike a runtime failure, this indicates a structural problem (malformed
/// SQL, schema mismatch, dead connection) rather than a performance
/// characteristic, so it is escalated to the caller instead of being folded
/// into the timeout bucket.
#[derive(Debug, Error)]
#[error("statement preparation failed: {0}")]
pub struct PrepareError(#[source] pub sqlx::Error);

/// Execute one statement and drain its full result set under a deadline.
///
/// The elapsed time covers execution plus complete result-set
/// materialization, not just query dispatch. Any failure after successful
/// preparation - deadline expiry or a driver error mid-drain - is recorded as
/// a timeout result carrying the full deadline as its elapsed time: the
/// driver layer cannot reliably distinguish "took too long" from "failed",
/// and both mean the statement was unusable within budget.
pub async fn execute(
    conn: &mut AnyConnection,
    query: &str,
    timeout: Duration,
) -> Result<ExecutionResult, PrepareError> {
    let statement = conn.prepare(query).await.map_err(PrepareError)?;

    let timeout_ms = timeout.as_millis() as u64;
    let started = Instant::now();
    match tokio::time::timeout(timeout, drain(conn, &statement)).await {
        Ok(Ok(row_count)) => Ok(ExecutionResult::completed(
            started.elapsed().as_millis() as u64,
            row_count,
        )),
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "execution failed after preparation");
            Ok(ExecutionResult::timed_out(timeout_ms))
        }
        Err(_elapsed) => Ok(ExecutionResult::timed_out(timeout_ms)),
    }
}

/// Run the prepared statement and count every row in the cursor.
async fn drain(conn: &mut AnyConnection, statement: &AnyStatement<'_>) -> sqlx::Result<u64> {
    let mut rows = statement.query().fetch(conn);
    let mut count = 0u64;
    while rows.try_next().await?.is_some() {
        count += 1;
    }
    Ok(count)
}
