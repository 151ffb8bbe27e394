//! Command-line argument parsing for sqltour.

use crate::error::{Result, TourError};
use crate::render::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// A guided walkthrough of advanced SQL querying over SQLite.
#[derive(Parser, Debug)]
#[command(name = "sqltour")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the SQLite database to explore (e.g. classicmodels.sqlite)
    #[arg(value_name = "DATABASE", env = "SQLTOUR_DATABASE")]
    pub database: Option<PathBuf>,

    /// Run a single ad-hoc query instead of the walkthrough
    #[arg(short = 'q', long, value_name = "SQL")]
    pub query: Option<String>,

    /// Run only the numbered lesson (1-based)
    #[arg(short = 'l', long, value_name = "N")]
    pub lesson: Option<usize>,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: String,

    /// Query timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum rows to print per query
    #[arg(long, value_name = "N")]
    pub max_rows: Option<usize>,

    /// SQL script applied before running; with no DATABASE, seeds an
    /// in-memory database
    #[arg(long, value_name = "PATH")]
    pub seed: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Parses the output format from the --format argument.
    pub fn parse_output_format(&self) -> Result<OutputFormat> {
        self.format.parse().map_err(TourError::Config)
    }

    /// Validates argument combinations.
    pub fn validate(&self) -> Result<()> {
        if self.query.is_some() && self.lesson.is_some() {
            return Err(TourError::config(
                "--query and --lesson are mutually exclusive",
            ));
        }
        Ok(())
    }
}
