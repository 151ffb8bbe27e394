//! The guided walkthrough itself.
//!
//! Five lessons, each a hand-written query against the classicmodels sample
//! database, ordered from a plain join to nested aggregation. Lessons run
//! sequentially through one `QueryRunner`; the first failure stops the tour
//! and propagates unchanged.

use std::io::Write;

use crate::db::DatabaseClient;
use crate::error::{Result, TourError};
use crate::query::QueryRunner;
use crate::render::{self, OutputFormat};
use tracing::info;

/// One titled teaching query.
#[derive(Debug, Clone, Copy)]
pub struct Lesson {
    /// 1-based position in the tour.
    pub number: usize,
    /// Short title shown above the result table.
    pub title: &'static str,
    /// One-line commentary on the technique being shown.
    pub commentary: &'static str,
    /// The query text, exactly as a student would type it.
    pub sql: &'static str,
}

const LESSONS: [Lesson; 5] = [
    Lesson {
        number: 1,
        title: "Joining tables",
        commentary: "An equi-join on the shared officeCode column, filtered on the joined table.",
        sql: "\
SELECT lastName, firstName, officeCode
FROM employees
JOIN offices
    USING(officeCode)
WHERE country = 'USA'",
    },
    Lesson {
        number: 2,
        title: "Filtering with a subquery",
        commentary: "The same employees, found by membership in a subquery instead of a join.",
        sql: "\
SELECT lastName, firstName, officeCode
FROM employees
WHERE officeCode IN (SELECT officeCode
                     FROM offices
                     WHERE country = 'USA')",
    },
    Lesson {
        number: 3,
        title: "Filtering on an aggregate",
        commentary: "A subquery that keeps only offices with at least five employees, via HAVING.",
        sql: "\
SELECT lastName, firstName, officeCode
FROM employees
WHERE officeCode IN (
    SELECT officeCode
    FROM offices
    JOIN employees
        USING(officeCode)
    GROUP BY 1
    HAVING COUNT(employeeNumber) >= 5
)",
    },
    Lesson {
        number: 4,
        title: "Chaining aggregates",
        commentary: "An average of per-customer averages: aggregation over an aggregated subquery.",
        sql: "\
SELECT AVG(customerAvgPayment) AS averagePayment
FROM (
    SELECT AVG(amount) AS customerAvgPayment
    FROM payments
    JOIN customers
        USING(customerNumber)
    GROUP BY customerNumber
)",
    },
    Lesson {
        number: 5,
        title: "Following a foreign key",
        commentary: "Employees selected through the foreign key customers hold on their sales rep.",
        sql: "\
SELECT lastName, firstName, employeeNumber
FROM employees
WHERE employeeNumber IN (SELECT salesRepEmployeeNumber
                         FROM customers
                         WHERE country = 'USA')",
    },
];

/// All lessons, in tour order.
pub fn lessons() -> &'static [Lesson] {
    &LESSONS
}

/// Looks up a lesson by its 1-based number.
pub fn lesson(number: usize) -> Option<&'static Lesson> {
    LESSONS.get(number.checked_sub(1)?)
}

/// Runs lessons against one database client and writes results out.
pub struct Tour<'a> {
    runner: QueryRunner<'a>,
    format: OutputFormat,
}

impl<'a> Tour<'a> {
    /// Creates a tour over the given client.
    pub fn new(db: &'a dyn DatabaseClient, format: OutputFormat) -> Self {
        Self {
            runner: QueryRunner::new(db),
            format,
        }
    }

    /// Runs every lesson in order, stopping at the first failure.
    pub async fn run_all(&self, out: &mut impl Write) -> Result<()> {
        for lesson in lessons() {
            self.run_lesson(lesson, out).await?;
        }
        Ok(())
    }

    /// Runs a single lesson and writes its result.
    pub async fn run_lesson(&self, lesson: &Lesson, out: &mut impl Write) -> Result<()> {
        info!("Running lesson {}: {}", lesson.number, lesson.title);

        let outcome = self.runner.run(lesson.sql).await?;

        match self.format {
            OutputFormat::Text => {
                writeln!(out, "== Lesson {}: {} ==", lesson.number, lesson.title)
                    .map_err(write_error)?;
                writeln!(out, "{}", lesson.commentary).map_err(write_error)?;
                writeln!(out).map_err(write_error)?;
                writeln!(out, "{}", lesson.sql).map_err(write_error)?;
                writeln!(out).map_err(write_error)?;
                writeln!(out, "{}", render::render_text(&outcome.table)).map_err(write_error)?;
                writeln!(out, "{}", render::summary_line(&outcome)).map_err(write_error)?;
                writeln!(out).map_err(write_error)?;
            }
            OutputFormat::Json => {
                writeln!(out, "{}", render::render_json(&outcome.table)?).map_err(write_error)?;
            }
        }

        Ok(())
    }
}

fn write_error(e: std::io::Error) -> TourError {
    TourError::internal(format!("Failed to write output: {e}"))
}
