//! Display-time arithmetic over [`JobRecord`] text fields.
//!
//! Scores and counts arrive as formatted text (`"12,345"`, `"87.6"`). Parsing
//! is deferred to here so stored and scraped rows stay byte-for-byte what the
//! source emitted.

use crate::jobs::JobRecord;
use crate::result::ResultSet;

/// How a result's `score` column should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Normalized 0-100 percentile.
    Percentile,
    /// Raw damage per second.
    Dps,
}

impl ScoreKind {
    #[must_use]
    pub fn for_result(result: &ResultSet) -> Self {
        if result.is_boss_specific() {
            ScoreKind::Dps
        } else {
            ScoreKind::Percentile
        }
    }
}

/// Parse a separator-formatted number. Returns `None` for empty, `NaN`, or
/// otherwise non-numeric text.
#[must_use]
pub fn parse_stat(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Share of the summed `count` held by each job, as a percentage.
///
/// Unparseable counts contribute zero. When the total is zero every share is
/// zero.
#[must_use]
pub fn popularity_shares(jobs: &[JobRecord]) -> Vec<(String, f64)> {
    let counts: Vec<f64> = jobs
        .iter()
        .map(|j| parse_stat(&j.count).unwrap_or(0.0).max(0.0))
        .collect();
    let total: f64 = counts.iter().sum();
    jobs.iter()
        .zip(counts)
        .map(|(job, count)| {
            let share = if total > 0.0 {
                count / total * 100.0
            } else {
                0.0
            };
            (job.job.clone(), share)
        })
        .collect()
}

/// Row with the highest parsed score. Rows whose score does not parse are
/// skipped.
#[must_use]
pub fn best_job(jobs: &[JobRecord]) -> Option<&JobRecord> {
    jobs.iter()
        .filter_map(|j| parse_stat(&j.score).map(|v| (j, v)))
        .fold(None, |best: Option<(&JobRecord, f64)>, (job, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((job, value)),
        })
        .map(|(job, _)| job)
}

/// `value` as a percentage of `best`; zero when `best` is not positive.
#[must_use]
pub fn percent_of_best(value: f64, best: f64) -> f64 {
    if best > 0.0 {
        value / best * 100.0
    } else {
        0.0
    }
}

/// Largest parsed score across all groups of a result, floored at 1.
#[must_use]
pub fn max_score(result: &ResultSet) -> f64 {
    result
        .groups
        .iter()
        .flat_map(|(_, jobs)| jobs.iter())
        .filter_map(|j| parse_stat(&j.score))
        .fold(1.0_f64, f64::max)
}

/// Bar fill percentage in `[0, 100]`.
///
/// Percentile scores are used as-is; DPS scores are scaled against `max`.
#[must_use]
pub fn bar_width(score: &str, kind: ScoreKind, max: f64) -> f64 {
    let Some(value) = parse_stat(score) else {
        return 0.0;
    };
    let width = match kind {
        ScoreKind::Percentile => value,
        ScoreKind::Dps => value / max.max(1.0) * 100.0,
    };
    width.clamp(0.0, 100.0)
}
