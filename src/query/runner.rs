//! The query runner: one SQL string in, one tabular result out.
//!
//! Borrows an open database client, guards against writes, and times the
//! execution. Everything else (join order, filtering, grouping, aggregation)
//! is delegated to the engine.

use std::time::{Duration, Instant};

use crate::db::{DatabaseClient, ResultTable};
use crate::error::{QueryReason, Result, TourError};
use crate::safety::{SqlGuard, Verdict};
use tracing::debug;

/// Executes single read-only queries against a borrowed database client.
///
/// The runner never opens or closes the connection, performs no retries,
/// and produces no partial results: a failed query yields no table.
pub struct QueryRunner<'a> {
    db: &'a dyn DatabaseClient,
    guard: SqlGuard,
}

impl<'a> QueryRunner<'a> {
    /// Creates a new query runner over the given client.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self {
            db,
            guard: SqlGuard::new(),
        }
    }

    /// Executes one SQL query and returns its result with timing.
    pub async fn run(&self, sql: &str) -> Result<RunOutcome> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(TourError::query(QueryReason::Other, "empty query text"));
        }

        if let Verdict::Write(kind) = self.guard.classify(sql) {
            return Err(TourError::query(
                QueryReason::ReadOnly,
                format!("refusing to execute {kind} statement: this tool only reads"),
            ));
        }

        let start = Instant::now();
        let table = self.db.execute_query(sql).await?;
        let execution_time = start.elapsed();

        debug!(
            rows = table.row_count(),
            elapsed_ms = execution_time.as_millis() as u64,
            "query finished"
        );

        Ok(RunOutcome {
            table,
            execution_time,
        })
    }
}

/// Successful query execution outcome.
#[derive(Debug)]
pub struct RunOutcome {
    /// The tabular result.
    pub table: ResultTable,
    /// How long the query took to execute.
    pub execution_time: Duration,
}
