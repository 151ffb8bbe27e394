//! Result rendering for standard output.
//!
//! Turns a `ResultTable` into an aligned text table or JSON. Formatting is
//! deliberately kept out of the query path: the runner produces values, this
//! module produces strings.

use crate::db::{ResultTable, Value};
use crate::error::{Result, TourError};
use crate::query::RunOutcome;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format for rendered results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table.
    #[default]
    Text,
    /// Pretty-printed JSON object with columns and rows.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Renders a result table in the requested format.
pub fn render(table: &ResultTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(table)),
        OutputFormat::Json => render_json(table),
    }
}

/// Renders a result table as an aligned text table.
pub fn render_text(table: &ResultTable) -> String {
    if table.columns.is_empty() {
        return "(no results)".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|col| col.name.as_str()));
    for row in &table.rows {
        builder.push_record(row.iter().map(Value::to_display_string));
    }

    builder.build().with(Style::sharp()).to_string()
}

/// Renders a result table as pretty-printed JSON.
pub fn render_json(table: &ResultTable) -> Result<String> {
    serde_json::to_string_pretty(table)
        .map_err(|e| TourError::internal(format!("Failed to serialize result: {e}")))
}

/// One-line summary of an executed query, with a truncation note if the row
/// cap was hit.
pub fn summary_line(outcome: &RunOutcome) -> String {
    let rows = outcome.table.row_count();
    let noun = if rows == 1 { "row" } else { "rows" };
    let elapsed_ms = outcome.execution_time.as_secs_f64() * 1000.0;

    match outcome.table.truncation_warning() {
        Some(warning) => format!("{rows} {noun} ({elapsed_ms:.1} ms) - {warning}"),
        None => format!("{rows} {noun} ({elapsed_ms:.1} ms)"),
    }
}
