//! Database abstraction layer for sqltour.
//!
//! Provides a trait-based interface for database operations, allowing
//! the real SQLite backend and the test mock to be used interchangeably.

mod mock;
mod sqlite;
mod types;

pub use mock::{FailingClient, MockClient};
pub use sqlite::SqliteClient;
pub use types::{ColumnInfo, ResultTable, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the backend as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a backend from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Opens a database client for the given connection configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = SqliteClient::connect(config).await?;
    Ok(Box::new(client))
}

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with TourError.
/// The client owns its connection; callers borrow the client for queries
/// and never open or close the underlying handle themselves.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Opens a connection for the given configuration.
    async fn connect(config: &ConnectionConfig) -> Result<Self>
    where
        Self: Sized;

    /// Executes a single SQL query and returns its tabular result.
    async fn execute_query(&self, sql: &str) -> Result<ResultTable>;

    /// Executes a multi-statement SQL script, discarding any results.
    ///
    /// Used to apply seed scripts and test fixtures.
    async fn execute_batch(&self, script: &str) -> Result<()>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
