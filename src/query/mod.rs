//! Query execution.

mod runner;

pub use runner::{QueryRunner, RunOutcome};
