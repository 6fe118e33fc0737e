use xivmeta_core::Zone;

/// Builds the zone statistics URL.
///
/// Class filter and dataset size are fixed; `boss` narrows the table to one
/// encounter.
#[must_use]
pub fn statistics_url(base_url: &str, zone: Zone, boss: Option<u32>) -> String {
    let base = base_url.trim_end_matches('/');
    let mut url = format!(
        "{base}/zone/statistics/{zone}?class=Any&dataset=50",
        zone = zone.id()
    );
    if let Some(boss) = boss {
        url.push_str(&format!("&boss={boss}"));
    }
    url
}
