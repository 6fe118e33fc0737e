mod report;
mod scrape;
mod snapshots;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::snapshots::SnapshotCommands;

#[derive(Debug, Parser)]
#[command(name = "xivmeta-cli")]
#[command(about = "Raid job statistics: scrape, store, and inspect snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the statistics page for a zone and print the grouped result
    Scrape {
        /// Zone id (65 = Ultimate, 68 = Savage)
        #[arg(long)]
        zone: u32,

        /// Narrow to a single encounter (forwarded as-is)
        #[arg(long)]
        boss: Option<u32>,

        /// Persist the result as a snapshot and print its id
        #[arg(long)]
        save: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Inspect stored snapshots
    Snapshots {
        #[command(subcommand)]
        command: SnapshotCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Table,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("xivmeta-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = xivmeta_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Scrape {
            zone,
            boss,
            save,
            format,
        } => {
            let pool = if save {
                Some(connect(&config).await?)
            } else {
                None
            };
            scrape::run_scrape(&config, pool.as_ref(), zone, boss, format).await?;
        }
        Commands::Snapshots { command } => {
            let pool = connect(&config).await?;
            snapshots::run(&pool, command).await?;
        }
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    xivmeta_db::health_check(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = xivmeta_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
            }
        }
    }

    Ok(())
}

async fn connect(config: &xivmeta_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = xivmeta_db::PoolConfig::from_app_config(config);
    let pool = xivmeta_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}
