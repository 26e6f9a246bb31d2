//! # Mall Site Main Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand};
use mall_site::{
    config::ConfigLoader,
    db,
    migration::{Migrator, MigratorTrait},
    seeds,
    server::run_server,
    telemetry,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mall-site")]
#[command(about = "Shopping centre website and content API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the site (default)
    Serve,
    /// Apply the mirrored schema to the configured database
    Migrate,
    /// Load the bundled content into empty tables
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;
    telemetry::init_tracing(&config)?;
    info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted) = config.redacted_json() {
        tracing::debug!(config = %redacted, "Effective configuration");
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let db = match db::init_pool(&config).await {
                Ok(conn) => Some(conn),
                Err(err) => {
                    warn!(error = %err, "Database unavailable; serving bundled content");
                    None
                }
            };
            run_server(config, db).await
        }
        Command::Migrate => {
            let db = db::init_pool(&config).await?;
            Migrator::up(&db, None)
                .await
                .context("applying migrations")?;
            info!("Migrations applied");
            Ok(())
        }
        Command::Seed => {
            let db = db::init_pool(&config).await?;
            seeds::seed_database(&db).await?;
            info!("Bundled content loaded");
            Ok(())
        }
    }
}
