//! sqltour - a guided walkthrough of advanced SQL querying over SQLite.

use sqltour::cli::Cli;
use sqltour::config::{Config, ConnectionConfig, QuerySettings};
use sqltour::db::{self, DatabaseClient};
use sqltour::error::{Result, TourError};
use sqltour::logging;
use sqltour::query::QueryRunner;
use sqltour::render::{self, OutputFormat};
use sqltour::tour::{self, Tour};
use tracing::{error, info};

fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run() {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;
    let format = cli.parse_output_format()?;

    let config_path = cli.config_path();
    let config = Config::load_from_file(&config_path)?;

    let connection = resolve_connection(&cli, &config)?;
    info!("Opening {}", connection.display_string());

    let client = db::connect(&connection).await?;

    if let Some(seed_path) = &cli.seed {
        let script = std::fs::read_to_string(seed_path).map_err(|e| {
            TourError::config(format!(
                "Failed to read seed script {}: {e}",
                seed_path.display()
            ))
        })?;
        client.execute_batch(&script).await?;
        info!("Seeded database from {}", seed_path.display());
    }

    let outcome = dispatch(&cli, client.as_ref(), format).await;
    client.close().await?;
    outcome
}

/// Resolves the final connection settings from CLI arguments, the config
/// file, and the environment (the CLI layer already folds SQLTOUR_DATABASE
/// into the database argument).
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let query = QuerySettings {
        timeout_secs: cli.timeout.unwrap_or(config.query.timeout_secs),
        max_rows: cli.max_rows.unwrap_or(config.query.max_rows),
    };

    let path = cli.database.clone().or_else(|| config.database.path.clone());

    match path {
        Some(path) => Ok(ConnectionConfig {
            path: Some(path),
            // A seed script has to write, whatever the config says.
            read_only: config.database.read_only && cli.seed.is_none(),
            query,
        }),
        None if cli.seed.is_some() => Ok(ConnectionConfig {
            path: None,
            read_only: false,
            query,
        }),
        None => Err(TourError::config(
            "no database specified: pass a path, set SQLTOUR_DATABASE, or configure [database] path",
        )),
    }
}

async fn dispatch(cli: &Cli, client: &dyn DatabaseClient, format: OutputFormat) -> Result<()> {
    let mut stdout = std::io::stdout();

    if let Some(sql) = &cli.query {
        let runner = QueryRunner::new(client);
        let outcome = runner.run(sql).await?;
        println!("{}", render::render(&outcome.table, format)?);
        if format == OutputFormat::Text {
            println!("{}", render::summary_line(&outcome));
        }
        return Ok(());
    }

    let tour = Tour::new(client, format);
    match cli.lesson {
        Some(number) => {
            let lesson = tour::lesson(number).ok_or_else(|| {
                TourError::config(format!(
                    "No lesson {number}: the tour has {} lessons",
                    tour::lessons().len()
                ))
            })?;
            tour.run_lesson(lesson, &mut stdout).await
        }
        None => tour.run_all(&mut stdout).await,
    }
}
