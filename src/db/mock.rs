//! Mock database clients for testing.
//!
//! `MockClient` returns canned results; `FailingClient` fails every call,
//! for exercising error paths without a real database.

use super::{ColumnInfo, DatabaseClient, ResultTable, Value};
use crate::config::ConnectionConfig;
use crate::error::{QueryReason, Result, TourError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mock database client that returns a predefined single-row result for
/// every SELECT and an empty result for everything else.
#[derive(Default)]
pub struct MockClient {
    executed: AtomicUsize,
}

impl MockClient {
    /// Creates a new mock client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queries executed so far.
    pub fn executed(&self) -> usize {
        self.executed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    async fn connect(_config: &ConnectionConfig) -> Result<Self>
    where
        Self: Sized,
    {
        Ok(Self::new())
    }

    async fn execute_query(&self, sql: &str) -> Result<ResultTable> {
        self.executed.fetch_add(1, Ordering::SeqCst);

        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            Ok(ResultTable::with_data(
                vec![ColumnInfo::new("result", "TEXT")],
                vec![vec![Value::String(format!("Mock result for: {sql}"))]],
            ))
        } else {
            Ok(ResultTable::default())
        }
    }

    async fn execute_batch(&self, _script: &str) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A client whose every operation fails with a connection-reason error.
#[derive(Debug, Default)]
pub struct FailingClient;

impl FailingClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseClient for FailingClient {
    async fn connect(_config: &ConnectionConfig) -> Result<Self>
    where
        Self: Sized,
    {
        Err(TourError::connection("mock connect failure"))
    }

    async fn execute_query(&self, _sql: &str) -> Result<ResultTable> {
        Err(TourError::query(
            QueryReason::Connection,
            "mock execute failure",
        ))
    }

    async fn execute_batch(&self, _script: &str) -> Result<()> {
        Err(TourError::query(
            QueryReason::Connection,
            "mock batch failure",
        ))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
