//! Human-readable rendering of a [`ResultSet`].

use std::fmt::Write as _;

use xivmeta_core::stats::{
    bar_width, best_job, max_score, parse_stat, percent_of_best, popularity_shares,
};
use xivmeta_core::{ResultSet, ScoreKind};

use crate::OutputFormat;

const BAR_CELLS: f64 = 20.0;

pub(crate) fn render(result: &ResultSet, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Table => Ok(render_table(result)?),
    }
}

/// One block per role group: score, percent of the group's best, share of
/// the group's parses, and a bar scaled the way the score kind requires.
pub(crate) fn render_table(result: &ResultSet) -> Result<String, std::fmt::Error> {
    let kind = ScoreKind::for_result(result);
    let max = max_score(result);
    let mut out = String::new();

    let kind_label = match kind {
        ScoreKind::Percentile => "percentile",
        ScoreKind::Dps => "dps",
    };
    writeln!(out, "{} [{kind_label}]", result.zone_name)?;
    if let Some(boss) = result.boss_name.as_deref().filter(|b| !b.is_empty()) {
        writeln!(out, "boss: {boss}")?;
    }
    writeln!(out, "as of {}", result.timestamp)?;

    for (group, jobs) in result.groups.iter() {
        writeln!(out)?;
        writeln!(out, "{}", group.label().to_uppercase())?;
        if jobs.is_empty() {
            writeln!(out, "  (no data)")?;
            continue;
        }

        let best = best_job(jobs)
            .and_then(|j| parse_stat(&j.score))
            .unwrap_or(0.0);
        let shares = popularity_shares(jobs);
        writeln!(
            out,
            "  {:<16}{:>10}{:>8}{:>8}{:>9}  BAR",
            "JOB", "SCORE", "%BEST", "SHARE", "COUNT"
        )?;
        for (job, (_, share)) in jobs.iter().zip(shares) {
            let of_best = parse_stat(&job.score).map_or(0.0, |v| percent_of_best(v, best));
            writeln!(
                out,
                "  {:<16}{:>10}{:>7.1}%{:>7.1}%{:>9}  {}",
                job.job,
                job.score,
                of_best,
                share,
                job.count,
                bar(bar_width(&job.score, kind, max)),
            )?;
        }
    }
    Ok(out)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(width_percent: f64) -> String {
    let cells = (width_percent / 100.0 * BAR_CELLS).round() as usize;
    "#".repeat(cells)
}
