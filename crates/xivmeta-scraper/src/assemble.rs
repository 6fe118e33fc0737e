use chrono::{SecondsFormat, Utc};
use xivmeta_core::{GroupedJobs, ResultSet, Zone};

use crate::acquire::{acquire, Acquisition, ScrapeSettings};
use crate::browser::BrowserLauncher;
use crate::error::ScraperError;

/// Current UTC time as ISO-8601 with millisecond precision and a `Z` suffix.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Shape a fresh acquisition into the client contract.
///
/// The page heading becomes `zone_name`. `boss_name` stays unset on this path;
/// the boss filter is visible in `url`.
#[must_use]
pub fn assemble(zone: Zone, acquisition: Acquisition) -> ResultSet {
    ResultSet {
        zone: Some(zone.id()),
        id: None,
        zone_name: acquisition.label,
        boss_name: None,
        url: Some(acquisition.url),
        timestamp: iso_timestamp(),
        groups: GroupedJobs::from_records(acquisition.rows),
    }
}

/// Acquire and assemble in one step.
///
/// # Errors
///
/// Propagates any [`ScraperError`] from [`acquire`].
pub async fn scrape(
    launcher: &dyn BrowserLauncher,
    settings: &ScrapeSettings,
    zone: Zone,
    boss: Option<u32>,
) -> Result<ResultSet, ScraperError> {
    let acquisition = acquire(launcher, settings, zone, boss).await?;
    Ok(assemble(zone, acquisition))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use xivmeta_core::JobRecord;

    #[test]
    fn timestamp_is_rfc3339_utc_with_millis() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'), "{ts}");
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000Z".len());
        DateTime::parse_from_rfc3339(&ts).expect("parses as RFC 3339");
    }

    #[test]
    fn assemble_groups_rows_and_keeps_source_url() {
        let acquisition = Acquisition {
            url: "https://www.fflogs.com/zone/statistics/68?class=Any&dataset=50&boss=97"
                .to_string(),
            rows: vec![
                JobRecord::new("Dragoon", "12.3", "450"),
                JobRecord::new("Sage", "8.1", "300"),
                JobRecord::new("Blue Mage", "1.0", "1"),
            ],
            label: "Black Cat".to_string(),
        };

        let result = assemble(Zone::Savage, acquisition);

        assert_eq!(result.zone, Some(68));
        assert_eq!(result.id, None);
        assert_eq!(result.zone_name, "Black Cat");
        assert_eq!(result.boss_name, None);
        assert!(result.is_boss_specific());
        assert_eq!(result.groups.melee, vec![JobRecord::new("Dragoon", "12.3", "450")]);
        assert_eq!(result.groups.healer, vec![JobRecord::new("Sage", "8.1", "300")]);
        assert_eq!(result.groups.len(), 2);
    }

    #[test]
    fn assemble_with_no_rows_still_has_every_group() {
        let acquisition = Acquisition {
            url: "https://www.fflogs.com/zone/statistics/65?class=Any&dataset=50".to_string(),
            rows: Vec::new(),
            label: String::new(),
        };
        let json = serde_json::to_value(assemble(Zone::Ultimate, acquisition)).expect("json");
        for key in ["melee", "caster", "ranged", "tank", "healer"] {
            assert_eq!(json["groups"][key], serde_json::json!([]), "{key}");
        }
        assert_eq!(json["zone"], 65);
    }
}
