//! Page acquisition: launch, navigate, wait, settle, extract, teardown.
//!
//! Every step runs sequentially against a browser launched for this call
//! alone. Teardown closes the page and then the browser on every exit path;
//! close failures are logged and dropped.

use std::time::Duration;

use xivmeta_core::{AppConfig, JobRecord, Zone};

use crate::browser::{Browser, BrowserLauncher, BrowserPage};
use crate::error::ScraperError;
use crate::extract::{extract_page_label, extract_rows, TABLE_SELECTOR};
use crate::url::statistics_url;

/// Timing and target settings for one acquisition.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub base_url: String,
    pub user_agent: String,
    pub navigation_timeout: Duration,
    pub table_timeout: Duration,
    /// Fixed pause after the table appears so client-side rendering can fill
    /// the remaining rows. A heuristic, not a guarantee.
    pub settle_delay: Duration,
    pub poll_interval: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.fflogs.com".to_string(),
            user_agent: "xivmeta/0.1 (raid-statistics)".to_string(),
            navigation_timeout: Duration::from_secs(20),
            table_timeout: Duration::from_secs(10),
            settle_delay: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(500),
        }
    }
}

impl ScrapeSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.fflogs_base_url.clone(),
            user_agent: config.scraper_user_agent.clone(),
            navigation_timeout: Duration::from_secs(config.scraper_navigation_timeout_secs),
            table_timeout: Duration::from_secs(config.scraper_table_timeout_secs),
            settle_delay: Duration::from_millis(config.scraper_settle_delay_ms),
            poll_interval: Duration::from_millis(config.scraper_poll_interval_ms),
        }
    }
}

/// Raw output of one acquisition, before grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquisition {
    pub url: String,
    pub rows: Vec<JobRecord>,
    pub label: String,
}

/// Load the statistics page for `zone` (optionally filtered to `boss`) and
/// extract its rows and heading.
///
/// # Errors
///
/// Returns the first [`ScraperError`] from launch, navigation, the table
/// wait, or extraction. Teardown errors are never returned.
pub async fn acquire(
    launcher: &dyn BrowserLauncher,
    settings: &ScrapeSettings,
    zone: Zone,
    boss: Option<u32>,
) -> Result<Acquisition, ScraperError> {
    let url = statistics_url(&settings.base_url, zone, boss);

    match run_session(launcher, settings, &url, boss.is_some()).await {
        Ok((rows, label)) => {
            tracing::info!(
                zone = zone.id(),
                ?boss,
                rows = rows.len(),
                label = %label,
                "statistics page acquired"
            );
            Ok(Acquisition { url, rows, label })
        }
        Err(e) => {
            tracing::error!(zone = zone.id(), ?boss, url = %url, error = %e, "acquisition failed");
            Err(e)
        }
    }
}

async fn run_session(
    launcher: &dyn BrowserLauncher,
    settings: &ScrapeSettings,
    url: &str,
    boss_requested: bool,
) -> Result<(Vec<JobRecord>, String), ScraperError> {
    tracing::debug!("launching browser");
    let mut browser = launcher.launch().await?;

    let mut page = match browser.new_page().await {
        Ok(page) => page,
        Err(e) => {
            close_browser(browser.as_mut()).await;
            return Err(e);
        }
    };

    let outcome = load_and_extract(page.as_mut(), settings, url, boss_requested).await;

    close_page(page.as_mut()).await;
    close_browser(browser.as_mut()).await;

    outcome
}

async fn load_and_extract(
    page: &mut dyn BrowserPage,
    settings: &ScrapeSettings,
    url: &str,
    boss_requested: bool,
) -> Result<(Vec<JobRecord>, String), ScraperError> {
    tracing::debug!(url, "navigating");
    match tokio::time::timeout(settings.navigation_timeout, page.goto(url)).await {
        Ok(result) => result?,
        Err(_) => {
            return Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: format!(
                    "timed out after {}ms",
                    settings.navigation_timeout.as_millis()
                ),
            })
        }
    }

    tracing::debug!(selector = TABLE_SELECTOR, "waiting for statistics table");
    page.wait_for_selector(TABLE_SELECTOR, settings.table_timeout).await?;

    if !settings.settle_delay.is_zero() {
        tracing::debug!(delay_ms = settings.settle_delay.as_millis(), "settling");
        tokio::time::sleep(settings.settle_delay).await;
    }

    let html = page.content().await?;
    tracing::debug!(bytes = html.len(), "extracting rows");
    let rows = extract_rows(&html)?;
    let label = extract_page_label(&html, boss_requested)?;
    Ok((rows, label))
}

async fn close_page(page: &mut dyn BrowserPage) {
    if let Err(e) = page.close().await {
        tracing::warn!(error = %e, "failed to close page");
    }
}

async fn close_browser(browser: &mut dyn Browser) {
    if let Err(e) = browser.close().await {
        tracing::warn!(error = %e, "failed to close browser");
    }
}

#[cfg(test)]
#[path = "acquire_test.rs"]
mod tests;
