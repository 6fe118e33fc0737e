//! Statistics table extraction from a loaded page document.
//!
//! Data rows are the `tr.odd` / `tr.even` rows the statistics site alternates;
//! header and footer rows carry neither class. Column layout per row:
//! job, score, rank (display only), count.

use scraper::{ElementRef, Html, Selector};
use xivmeta_core::JobRecord;

use crate::error::ScraperError;

pub const TABLE_SELECTOR: &str = "table";
pub const DATA_ROW_SELECTOR: &str = "tr.odd, tr.even";
pub const CELL_SELECTOR: &str = "td";
pub const BOSS_TITLE_SELECTOR: &str = "#filter-boss-text";
pub const ZONE_TITLE_SELECTOR: &str = "a.zone-name";

const MIN_CELLS: usize = 4;
const JOB_CELL: usize = 0;
const SCORE_CELL: usize = 1;
const COUNT_CELL: usize = 3;

fn parse_selector(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Extract one [`JobRecord`] per data row, in table order.
///
/// Rows with fewer than four cells are skipped. Nothing is sorted or merged.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] only if a built-in selector
/// fails to parse.
pub fn extract_rows(html: &str) -> Result<Vec<JobRecord>, ScraperError> {
    let row_sel = parse_selector(DATA_ROW_SELECTOR)?;
    let cell_sel = parse_selector(CELL_SELECTOR)?;
    let document = Html::parse_document(html);

    let mut rows = Vec::new();
    for row in document.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
        if cells.len() < MIN_CELLS {
            tracing::debug!(cells = cells.len(), "skipping short statistics row");
            continue;
        }
        rows.push(JobRecord::new(
            cells[JOB_CELL].clone(),
            cells[SCORE_CELL].clone(),
            cells[COUNT_CELL].clone(),
        ));
    }
    Ok(rows)
}

/// Extract the page heading used as the result's zone name.
///
/// With a boss filter the boss title wins when present and non-empty;
/// otherwise the zone title is used. Missing both yields an empty string.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] only if a built-in selector
/// fails to parse.
pub fn extract_page_label(html: &str, boss_requested: bool) -> Result<String, ScraperError> {
    let document = Html::parse_document(html);

    if boss_requested {
        let label = first_text(&document, BOSS_TITLE_SELECTOR)?;
        if !label.is_empty() {
            return Ok(label);
        }
    }
    first_text(&document, ZONE_TITLE_SELECTOR)
}

fn first_text(document: &Html, selector: &str) -> Result<String, ScraperError> {
    let sel = parse_selector(selector)?;
    Ok(document.select(&sel).next().map(element_text).unwrap_or_default())
}

/// `true` if any element in `html` matches `selector`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidSelector`] if `selector` does not parse.
pub fn document_has(html: &str, selector: &str) -> Result<bool, ScraperError> {
    let sel = parse_selector(selector)?;
    let document = Html::parse_document(html);
    let found = document.select(&sel).next().is_some();
    Ok(found)
}
