//! Static job-to-role lookup.

use serde::{Deserialize, Serialize};

use crate::jobs::normalize_job_name;

/// Coarse role bucket a job belongs to. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleGroup {
    Melee,
    Caster,
    Ranged,
    Tank,
    Healer,
}

impl RoleGroup {
    /// All groups, in the order they are emitted.
    pub const ALL: [RoleGroup; 5] = [
        RoleGroup::Melee,
        RoleGroup::Caster,
        RoleGroup::Ranged,
        RoleGroup::Tank,
        RoleGroup::Healer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RoleGroup::Melee => "melee",
            RoleGroup::Caster => "caster",
            RoleGroup::Ranged => "ranged",
            RoleGroup::Tank => "tank",
            RoleGroup::Healer => "healer",
        }
    }

    /// Display label, e.g. `"Melee"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RoleGroup::Melee => "Melee",
            RoleGroup::Caster => "Caster",
            RoleGroup::Ranged => "Ranged",
            RoleGroup::Tank => "Tank",
            RoleGroup::Healer => "Healer",
        }
    }

    #[must_use]
    pub const fn is_dps(self) -> bool {
        matches!(
            self,
            RoleGroup::Melee | RoleGroup::Caster | RoleGroup::Ranged
        )
    }

    /// Normalized job names that belong to this group.
    #[must_use]
    pub fn jobs(self) -> &'static [&'static str] {
        match ROLE_TABLE.iter().find(|(group, _)| *group == self) {
            Some((_, names)) => *names,
            None => &[],
        }
    }
}

impl std::fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Lists are disjoint. Names are already normalized (trimmed, lowercase).
static ROLE_TABLE: [(RoleGroup, &[&str]); 5] = [
    (
        RoleGroup::Melee,
        &["viper", "monk", "dragoon", "samurai", "ninja", "reaper"],
    ),
    (
        RoleGroup::Caster,
        &["red mage", "black mage", "pictomancer", "summoner"],
    ),
    (RoleGroup::Ranged, &["dancer", "machinist", "bard"]),
    (
        RoleGroup::Tank,
        &["warrior", "gunbreaker", "dark knight", "paladin"],
    ),
    (
        RoleGroup::Healer,
        &["astrologian", "scholar", "white mage", "sage"],
    ),
];

/// Classify a job display name into its role group.
///
/// Matching ignores surrounding whitespace and case. Returns `None` for names
/// that appear in no list; callers drop those rows.
#[must_use]
pub fn classify(job_name: &str) -> Option<RoleGroup> {
    let normalized = normalize_job_name(job_name);
    if normalized.is_empty() {
        return None;
    }
    ROLE_TABLE
        .iter()
        .find(|(_, names)| names.contains(&normalized.as_str()))
        .map(|(group, _)| *group)
}
