//! Read-only statement guard.
//!
//! Parses SQL and decides whether a statement only reads, so the tour can
//! refuse anything that would modify data or schema before it reaches the
//! engine.

mod parser;

pub use parser::{classify_sql, SqlGuard};

use std::fmt;

/// The type of SQL statement detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Explain,
    Insert,
    Update,
    Delete,
    Drop,
    Alter,
    Create,
    /// Multiple statements detected; contains the most significant kind.
    Multiple(Box<StatementKind>),
    /// Statement type could not be determined.
    Unknown,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Explain => write!(f, "EXPLAIN"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Drop => write!(f, "DROP"),
            Self::Alter => write!(f, "ALTER"),
            Self::Create => write!(f, "CREATE"),
            Self::Multiple(inner) => write!(f, "multiple ({inner})"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Guard verdict for one piece of SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every statement only reads; safe to execute.
    ReadOnly(StatementKind),
    /// At least one statement would write; contains the offending kind.
    Write(StatementKind),
    /// The guard could not parse the text. The statement is handed to the
    /// engine so its own error (usually a syntax error) surfaces unchanged.
    Unparsed,
}

impl Verdict {
    /// Returns true unless the statement was positively identified as a write.
    pub fn allows_execution(&self) -> bool {
        !matches!(self, Self::Write(_))
    }

    /// The detected statement kind, if parsing succeeded.
    pub fn kind(&self) -> Option<&StatementKind> {
        match self {
            Self::ReadOnly(kind) | Self::Write(kind) => Some(kind),
            Self::Unparsed => None,
        }
    }
}
