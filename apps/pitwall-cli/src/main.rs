//! # Pitwall CLI
//!
//! Read-side front end for the motorsport registry.
//!
//! ## Usage
//! ```bash
//! pitwall report 6 2023        # races held in country 6 during 2023
//! pitwall list speedways       # every speedway, as JSON
//! pitwall get pilot 7          # one pilot, as JSON
//! pitwall results 6            # results of race 6, best placement first
//! pitwall status               # database health and migration state
//! pitwall config               # effective configuration, as TOML
//! ```
//!
//! ## Exit Codes
//! ```text
//! 0  success
//! 1  usage, configuration, or store failure
//! 2  not found           (the lookup matched nothing)
//! 3  integrity violation (a rule rejected the input)
//! ```

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pitwall_core::EntityId;
use pitwall_db::Database;
use pitwall_service::{Registry, ServiceError};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::PitwallConfig;

#[derive(Debug, Parser)]
#[command(name = "pitwall", version, about = "Query the motorsport registry")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(short, long, global = true, env = "PITWALL_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Command {
    /// Races held in a country during a year
    Report { country_id: EntityId, year: i32 },

    /// Every row of one entity
    List {
        #[arg(value_enum)]
        entity: Listing,
    },

    /// One row by id
    Get {
        #[arg(value_enum)]
        entity: Single,
        id: EntityId,
    },

    /// Results of a race, best placement first
    Results { race_id: EntityId },

    /// Database health and migration state, without migrating
    Status,

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Listing {
    Countries,
    Teams,
    Speedways,
    Championships,
    Pilots,
    Races,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Single {
    Country,
    Team,
    Speedway,
    Championship,
    Pilot,
    Race,
    Result,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    database: String,
    healthy: bool,
    migrations_known: usize,
    migrations_applied: usize,
    up_to_date: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Maps service outcomes to the documented exit codes.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ServiceError>() {
        Some(ServiceError::NotFound(_)) => 2,
        Some(ServiceError::IntegrityViolation(_)) => 3,
        _ => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PitwallConfig::load(cli.config).context("failed to load configuration")?;
    if let Some(path) = cli.db {
        config.database.path = path;
    }

    init_tracing(&config.log.filter);

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::Status => status(&config).await,
        command => {
            info!(path = %config.database.path.display(), "Opening registry");
            let db = Database::new(config.db_config())
                .await
                .context("failed to open database")?;
            let registry = Registry::new(&db, config.championship_years());

            let outcome = execute(&registry, command).await;
            db.close().await;
            outcome
        }
    }
}

async fn status(config: &PitwallConfig) -> anyhow::Result<()> {
    let db = Database::new(config.db_config().run_migrations(false))
        .await
        .context("failed to open database")?;

    let healthy = db.health_check().await;
    let migrations = db.migration_status().await?;
    db.close().await;

    print_json(&StatusReport {
        database: config.database.path.display().to_string(),
        healthy,
        migrations_known: migrations.total,
        migrations_applied: migrations.applied,
        up_to_date: migrations.is_current(),
    })
}

async fn execute(registry: &Registry, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Report { country_id, year } => {
            print_json(&registry.report.races_by_country_and_year(country_id, year).await?)
        }
        Command::Results { race_id } => {
            let race = registry.races.find_by_id(race_id).await?;
            print_json(&registry.pilot_races.find_by_race_by_placement(&race).await?)
        }
        Command::List { entity } => match entity {
            Listing::Countries => print_json(&registry.countries.list_all().await?),
            Listing::Teams => print_json(&registry.teams.list_all().await?),
            Listing::Speedways => print_json(&registry.speedways.list_all().await?),
            Listing::Championships => print_json(&registry.championships.list_all().await?),
            Listing::Pilots => print_json(&registry.pilots.list_all().await?),
            Listing::Races => print_json(&registry.races.list_all().await?),
            Listing::Results => print_json(&registry.pilot_races.list_all().await?),
        },
        Command::Get { entity, id } => match entity {
            Single::Country => print_json(&registry.countries.find_by_id(id).await?),
            Single::Team => print_json(&registry.teams.find_by_id(id).await?),
            Single::Speedway => print_json(&registry.speedways.find_by_id(id).await?),
            Single::Championship => print_json(&registry.championships.find_by_id(id).await?),
            Single::Pilot => print_json(&registry.pilots.find_by_id(id).await?),
            Single::Race => print_json(&registry.races.find_by_id(id).await?),
            Single::Result => print_json(&registry.pilot_races.find_by_id(id).await?),
        },
        Command::Status | Command::Config => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over the configured filter. Logs go to stderr so stdout
/// stays valid JSON.
fn init_tracing(configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("pitwall").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_report_with_options() {
        let cli = parse(&["--db", "/tmp/p.db", "report", "6", "2023"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/p.db")));
        assert_eq!(
            cli.command,
            Command::Report {
                country_id: 6,
                year: 2023
            }
        );
    }

    #[test]
    fn test_parse_get_and_list() {
        let cli = parse(&["get", "pilot", "7"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Get {
                entity: Single::Pilot,
                id: 7
            }
        );

        let cli = parse(&["list", "races", "-c", "p.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert_eq!(
            cli.command,
            Command::List {
                entity: Listing::Races
            }
        );

        assert_eq!(parse(&["status"]).unwrap().command, Command::Status);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["report", "six", "2023"]).is_err());
        assert!(parse(&["list", "engines"]).is_err());
        assert!(parse(&["explode"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let not_found = anyhow::Error::new(ServiceError::not_found("País 10 não existe"));
        assert_eq!(exit_status(&not_found), 2);

        let invalid = anyhow::Error::new(ServiceError::from(
            pitwall_core::ValidationError::MissingYear,
        ));
        assert_eq!(exit_status(&invalid), 3);

        assert_eq!(exit_status(&anyhow::anyhow!("boom")), 1);
    }
}
