use xivmeta_core::{AppConfig, ResultSet, Zone};
use xivmeta_db::StoredPayload;
use xivmeta_scraper::{HttpLauncher, ScrapeSettings};

use crate::report::render;
use crate::OutputFormat;

/// Scrape one zone (optionally one boss) through the same acquirer the server
/// uses, print it, and optionally persist it.
///
/// # Errors
///
/// Returns an error for a zone outside the allow-list, any acquisition
/// failure, or a failed insert when `pool` is given.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    pool: Option<&sqlx::PgPool>,
    zone_id: u32,
    boss: Option<u32>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let zone = Zone::from_id(zone_id).ok_or_else(|| {
        anyhow::anyhow!("invalid zone {zone_id}; only zones 65 and 68 are supported")
    })?;
    if let Some(boss) = boss {
        if !zone.known_bosses().is_empty() && !zone.known_bosses().contains(&boss) {
            tracing::warn!(zone = zone.id(), boss, "boss id is not a known encounter for this zone");
        }
    }

    let settings = ScrapeSettings::from_app_config(config);
    let launcher = HttpLauncher::from_settings(&settings);
    let mut result = xivmeta_scraper::scrape(&launcher, &settings, zone, boss).await?;
    apply_fallback_name(&mut result, zone);

    println!("{}", render(&result, format)?);

    if let Some(pool) = pool {
        let payload = StoredPayload::from_result_set(&result);
        let row = xivmeta_db::insert_snapshot(pool, &payload).await?;
        tracing::info!(id = row.id, jobs = payload.jobs.len(), "snapshot saved");
        println!("saved snapshot {}", row.id);
    }

    Ok(())
}

/// Pages occasionally render without a heading; give the result a stable
/// name so stored snapshots are still identifiable.
pub(crate) fn apply_fallback_name(result: &mut ResultSet, zone: Zone) {
    if result.zone_name.trim().is_empty() {
        result.zone_name = zone.fallback_name();
    }
}
