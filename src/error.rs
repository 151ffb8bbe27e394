//! Error types for sqltour.
//!
//! Defines the main error enum used throughout the application.

use std::fmt;
use thiserror::Error;

/// Reason code attached to query execution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryReason {
    /// The SQL text is malformed.
    Syntax,
    /// The SQL references an unknown table or column.
    Schema,
    /// The connection is closed or otherwise unusable.
    Connection,
    /// Execution exceeded the configured timeout.
    Timeout,
    /// The statement would write, and this tool only reads.
    ReadOnly,
    /// Anything the other reasons do not cover.
    Other,
}

impl fmt::Display for QueryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Schema => write!(f, "schema"),
            Self::Connection => write!(f, "connection"),
            Self::Timeout => write!(f, "timeout"),
            Self::ReadOnly => write!(f, "read-only"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Main error type for sqltour operations.
#[derive(Error, Debug)]
pub enum TourError {
    /// Failures opening the database (missing file, not a database, locked).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution failures, tagged with a reason code.
    #[error("Query error ({reason}): {message}")]
    Query {
        reason: QueryReason,
        message: String,
    },

    /// Configuration errors (invalid config file, missing database path, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TourError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given reason code and message.
    pub fn query(reason: QueryReason, msg: impl Into<String>) -> Self {
        Self::Query {
            reason,
            message: msg.into(),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query { .. } => "Query Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the reason code if this is a query error.
    pub fn query_reason(&self) -> Option<QueryReason> {
        match self {
            Self::Query { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Result type alias using TourError.
pub type Result<T> = std::result::Result<T, TourError>;
