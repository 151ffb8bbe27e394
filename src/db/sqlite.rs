//! SQLite database client implementation.
//!
//! Provides the `SqliteClient` struct that implements the `DatabaseClient`
//! trait using sqlx. The pool is capped at a single connection: the tour
//! issues queries strictly sequentially, and in-memory databases would not
//! survive a second connection.

use crate::config::{ConnectionConfig, QuerySettings};
use crate::db::{ColumnInfo, DatabaseClient, ResultTable, Row, Value};
use crate::error::{QueryReason, Result, TourError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Executor, Row as SqlxRow, TypeInfo, ValueRef};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of open attempts when the database file is locked.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between retry attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// SQLite database client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
    settings: QuerySettings,
}

fn connect_options(config: &ConnectionConfig) -> Result<SqliteConnectOptions> {
    match &config.path {
        // A missing file is a connection error, not a fresh empty database.
        Some(path) => Ok(SqliteConnectOptions::new()
            .filename(path)
            .read_only(config.read_only)
            .create_if_missing(false)),
        None => SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| TourError::connection(format!("Cannot open in-memory database: {e}"))),
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = connect_options(config)?;

        let mut last_error = None;
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);

        for attempt in 1..=MAX_RETRY_ATTEMPTS {
            debug!("Connection attempt {} of {}", attempt, MAX_RETRY_ATTEMPTS);

            let result = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options.clone())
                .await;

            match result {
                Ok(pool) => {
                    debug!("Opened {}", config.display_string());
                    return Ok(Self {
                        pool,
                        settings: config.query,
                    });
                }
                Err(e) => {
                    let is_transient = is_locked_error(&e);
                    last_error = Some(e);

                    if attempt < MAX_RETRY_ATTEMPTS && is_transient {
                        warn!(
                            "Connection attempt {} failed (database locked), retrying in {:?}",
                            attempt, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2; // Exponential backoff
                    }
                }
            }
        }

        // All retries exhausted
        Err(map_connection_error(
            last_error.expect("at least one attempt was made"),
            config,
        ))
    }

    async fn execute_query(&self, sql: &str) -> Result<ResultTable> {
        let timeout = Duration::from_secs(self.settings.timeout_secs);

        let fetched = tokio::time::timeout(timeout, sqlx::query(sql).fetch_all(&self.pool))
            .await
            .map_err(|_| {
                TourError::query(
                    QueryReason::Timeout,
                    format!(
                        "Query timed out after {} seconds",
                        self.settings.timeout_secs
                    ),
                )
            })?
            .map_err(map_query_error)?;

        // Column metadata comes from the first row if there is one, otherwise
        // from the prepared statement, so empty results still name their
        // projection.
        let columns: Vec<ColumnInfo> = if let Some(first_row) = fetched.first() {
            first_row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect()
        } else {
            self.statement_columns(sql).await.unwrap_or_default()
        };

        let max_rows = self.settings.max_rows;
        let total_rows = fetched.len();
        let was_truncated = total_rows > max_rows;

        if was_truncated {
            warn!(
                "Query returned {} rows, truncating to {} rows",
                total_rows, max_rows
            );
        }

        let rows: Vec<Row> = fetched.iter().take(max_rows).map(convert_row).collect();

        Ok(ResultTable {
            columns,
            rows,
            total_rows: Some(total_rows),
            was_truncated,
        })
    }

    async fn execute_batch(&self, script: &str) -> Result<()> {
        self.pool.execute(script).await.map_err(map_query_error)?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

impl SqliteClient {
    /// Column metadata for a query that produced no rows, taken from the
    /// prepared statement instead of a result row.
    async fn statement_columns(&self, sql: &str) -> Result<Vec<ColumnInfo>> {
        let statement = self.pool.describe(sql).await.map_err(map_query_error)?;
        Ok(statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect())
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|index| convert_value(row, index))
        .collect()
}

/// Converts a single column value, dispatching on SQLite's storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) => {
            if raw.is_null() {
                return Value::Null;
            }
            raw.type_info().name().to_uppercase()
        }
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "BOOLEAN" | "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "INTEGER" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // TEXT, DATE, DATETIME, and anything else: take it as a string.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Determines if an open error is SQLite's transient lock contention.
fn is_locked_error(error: &sqlx::Error) -> bool {
    let error_str = error.to_string().to_lowercase();
    error_str.contains("database is locked") || error_str.contains("database is busy")
}

/// Maps sqlx open errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, config: &ConnectionConfig) -> TourError {
    let target = config.display_string();
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("unable to open") {
        TourError::connection(format!(
            "Cannot open database file {target}. Check that the file exists and is readable."
        ))
    } else if error_str.contains("not a database") {
        TourError::connection(format!("{target} is not a SQLite database."))
    } else if error_str.contains("locked") || error_str.contains("busy") {
        TourError::connection(format!("Database {target} is locked by another process."))
    } else {
        TourError::connection(error.to_string())
    }
}

/// Maps sqlx execution errors to reason-tagged query errors.
fn map_query_error(error: sqlx::Error) -> TourError {
    if matches!(error, sqlx::Error::PoolClosed) {
        return TourError::query(QueryReason::Connection, "connection is closed");
    }

    if let Some(db_error) = error.as_database_error() {
        let message = db_error.message().to_string();
        let lowered = message.to_lowercase();
        let reason = if lowered.contains("syntax error") {
            QueryReason::Syntax
        } else if lowered.contains("no such table") || lowered.contains("no such column") {
            QueryReason::Schema
        } else {
            QueryReason::Other
        };
        return TourError::query(reason, message);
    }

    match error {
        sqlx::Error::Io(e) => TourError::query(QueryReason::Connection, e.to_string()),
        other => TourError::query(QueryReason::Other, other.to_string()),
    }
}
