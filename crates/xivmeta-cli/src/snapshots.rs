//! Snapshot inspection commands.

use clap::Subcommand;
use xivmeta_db::{DbError, StoredSnapshot};

use crate::report::render;
use crate::OutputFormat;

/// Sub-commands available under `snapshots`.
#[derive(Debug, Subcommand)]
pub enum SnapshotCommands {
    /// List every stored snapshot
    List,
    /// Print one snapshot reshaped into grouped form
    Show {
        id: i64,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: SnapshotCommands) -> anyhow::Result<()> {
    match command {
        SnapshotCommands::List => run_list(pool).await,
        SnapshotCommands::Show { id, format } => run_show(pool, id, format).await,
    }
}

async fn run_list(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let rows = xivmeta_db::list_snapshots(pool).await?;
    if rows.is_empty() {
        println!("no snapshots stored; run `scrape --save` first");
        return Ok(());
    }

    println!("{:<8}{:<22}{:<6}ZONE", "ID", "CREATED", "JOBS");
    for row in rows {
        let id = row.id;
        let created = row.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        match xivmeta_db::normalize_payload(id, row.data) {
            Ok(payload) => println!(
                "{id:<8}{created:<22}{:<6}{}",
                payload.jobs.len(),
                payload.zone_name
            ),
            Err(e) => {
                tracing::warn!(id, error = %e, "skipping malformed snapshot in listing");
                println!("{id:<8}{created:<22}{:<6}<malformed payload>", "-");
            }
        }
    }
    Ok(())
}

async fn run_show(pool: &sqlx::PgPool, id: i64, format: OutputFormat) -> anyhow::Result<()> {
    let row = xivmeta_db::get_snapshot(pool, id)
        .await?
        .ok_or(DbError::NotFound)?;
    let result = StoredSnapshot::from_row(row)?.into_result_set();
    println!("{}", render(&result, format)?);
    Ok(())
}
