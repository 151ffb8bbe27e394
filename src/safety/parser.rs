//! SQL parsing and read-only classification logic.
//!
//! Uses sqlparser-rs with the SQLite dialect. The recursion matters:
//! a data-modifying CTE or derived table hidden inside a SELECT must be
//! caught, not just top-level INSERT/UPDATE/DELETE.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use super::{StatementKind, Verdict};

/// SQL guard that parses queries and decides whether they only read.
#[derive(Debug)]
pub struct SqlGuard {
    dialect: SQLiteDialect,
}

impl Default for SqlGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlGuard {
    /// Creates a new SQL guard.
    pub fn new() -> Self {
        Self {
            dialect: SQLiteDialect {},
        }
    }

    /// Classifies a SQL string.
    ///
    /// Text that does not parse is `Unparsed`, not refused: the engine's own
    /// syntax error is more useful than a guard guess, and a statement the
    /// parser rejects cannot have executed anything.
    pub fn classify(&self, sql: &str) -> Verdict {
        let Ok(statements) = Parser::parse_sql(&self.dialect, sql) else {
            return Verdict::Unparsed;
        };

        if statements.is_empty() {
            return Verdict::Unparsed;
        }

        if statements.len() == 1 {
            let (read_only, kind) = classify_statement(&statements[0]);
            return if read_only {
                Verdict::ReadOnly(kind)
            } else {
                Verdict::Write(kind)
            };
        }

        // Multiple statements: every one of them must be read-only.
        for statement in &statements {
            let (read_only, kind) = classify_statement(statement);
            if !read_only {
                return Verdict::Write(StatementKind::Multiple(Box::new(kind)));
            }
        }

        Verdict::ReadOnly(StatementKind::Multiple(Box::new(StatementKind::Select)))
    }
}

/// Convenience function to classify SQL without creating a guard instance.
pub fn classify_sql(sql: &str) -> Verdict {
    SqlGuard::new().classify(sql)
}

/// Classifies a single parsed statement as (read_only, kind).
fn classify_statement(statement: &Statement) -> (bool, StatementKind) {
    match statement {
        // Query: may contain data-modifying CTEs, so recurse
        Statement::Query(query) => classify_query(query),

        Statement::Explain {
            analyze, statement, ..
        } => {
            if *analyze {
                // EXPLAIN ANALYZE executes the inner statement
                (classify_statement(statement).0, StatementKind::Explain)
            } else {
                (true, StatementKind::Explain)
            }
        }

        Statement::Insert(_) => (false, StatementKind::Insert),
        Statement::Update { .. } => (false, StatementKind::Update),
        Statement::Delete(_) => (false, StatementKind::Delete),

        Statement::Drop { .. } => (false, StatementKind::Drop),
        Statement::AlterTable { .. } => (false, StatementKind::Alter),
        Statement::AlterIndex { .. } => (false, StatementKind::Alter),
        Statement::AlterView { .. } => (false, StatementKind::Alter),
        Statement::CreateTable { .. } => (false, StatementKind::Create),
        Statement::CreateIndex { .. } => (false, StatementKind::Create),
        Statement::CreateView { .. } => (false, StatementKind::Create),
        Statement::CreateVirtualTable { .. } => (false, StatementKind::Create),

        // Conservative default: anything unrecognized is treated as a write
        _ => (false, StatementKind::Unknown),
    }
}

/// Classifies a Query by recursively inspecting for data-modifying
/// operations. Returns the first offending kind found, if any.
fn classify_query(query: &Query) -> (bool, StatementKind) {
    // Check CTEs in WITH clause
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            let (read_only, kind) = classify_query(&cte.query);
            if !read_only {
                return (false, kind);
            }
        }
    }

    classify_set_expr(&query.body)
}

/// Classifies a SetExpr, detecting mutations and recursing into nested queries.
fn classify_set_expr(set_expr: &SetExpr) -> (bool, StatementKind) {
    match set_expr {
        // Direct mutations in CTE bodies (wrapped as Statement)
        SetExpr::Update(stmt) => classify_statement(stmt),
        SetExpr::Insert(stmt) => classify_statement(stmt),

        // Nested query - recurse
        SetExpr::Query(query) => classify_query(query),

        // SELECT - check FROM clause for subqueries
        SetExpr::Select(select) => classify_select(select),

        // Set operations (UNION, INTERSECT, EXCEPT) - check both sides
        SetExpr::SetOperation { left, right, .. } => {
            let (left_read_only, left_kind) = classify_set_expr(left);
            if !left_read_only {
                return (false, left_kind);
            }
            classify_set_expr(right)
        }

        // Values, Table - safe (no subqueries possible)
        SetExpr::Values(_) | SetExpr::Table(_) => (true, StatementKind::Select),
    }
}

/// Classifies a Select by checking its FROM clause for subqueries.
fn classify_select(select: &Select) -> (bool, StatementKind) {
    for table_with_joins in &select.from {
        let (read_only, kind) = classify_table_with_joins(table_with_joins);
        if !read_only {
            return (false, kind);
        }
    }

    (true, StatementKind::Select)
}

/// Classifies a TableWithJoins, checking the main relation and all joins.
fn classify_table_with_joins(twj: &TableWithJoins) -> (bool, StatementKind) {
    let (read_only, kind) = classify_table_factor(&twj.relation);
    if !read_only {
        return (false, kind);
    }

    for join in &twj.joins {
        let (read_only, kind) = classify_table_factor(&join.relation);
        if !read_only {
            return (false, kind);
        }
    }

    (true, StatementKind::Select)
}

/// Classifies a TableFactor, recursing into derived tables (subqueries).
fn classify_table_factor(factor: &TableFactor) -> (bool, StatementKind) {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        // Other variants (Table, TableFunction, etc.) are safe
        _ => (true, StatementKind::Select),
    }
}
