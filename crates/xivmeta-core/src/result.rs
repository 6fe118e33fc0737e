use serde::{Deserialize, Serialize};

use crate::jobs::JobRecord;
use crate::roles::{classify, RoleGroup};

/// Job rows bucketed by role.
///
/// Every group is a named field so the serialized form always carries all
/// five keys, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedJobs {
    pub melee: Vec<JobRecord>,
    pub caster: Vec<JobRecord>,
    pub ranged: Vec<JobRecord>,
    pub tank: Vec<JobRecord>,
    pub healer: Vec<JobRecord>,
}

impl GroupedJobs {
    /// Bucket rows by role, keeping source order within each group.
    ///
    /// Rows with an empty job name or a job that classifies to no group are
    /// dropped. Duplicate jobs are not merged.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = JobRecord>,
    {
        let mut grouped = Self::default();
        for record in records {
            if record.job.trim().is_empty() {
                continue;
            }
            if let Some(group) = classify(&record.job) {
                grouped.group_mut(group).push(record);
            }
        }
        grouped
    }

    #[must_use]
    pub fn group(&self, group: RoleGroup) -> &[JobRecord] {
        match group {
            RoleGroup::Melee => &self.melee,
            RoleGroup::Caster => &self.caster,
            RoleGroup::Ranged => &self.ranged,
            RoleGroup::Tank => &self.tank,
            RoleGroup::Healer => &self.healer,
        }
    }

    fn group_mut(&mut self, group: RoleGroup) -> &mut Vec<JobRecord> {
        match group {
            RoleGroup::Melee => &mut self.melee,
            RoleGroup::Caster => &mut self.caster,
            RoleGroup::Ranged => &mut self.ranged,
            RoleGroup::Tank => &mut self.tank,
            RoleGroup::Healer => &mut self.healer,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoleGroup, &[JobRecord])> {
        RoleGroup::ALL.into_iter().map(move |g| (g, self.group(g)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().map(|(_, jobs)| jobs.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Client-ready payload for one zone/boss/id query.
///
/// `zone` and `url` are set on the scrape path; `id` on the lookup path.
/// `timestamp` is kept as text so a stored record's timestamp passes through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub zone_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boss_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timestamp: String,
    pub groups: GroupedJobs,
}

impl ResultSet {
    /// `true` when the result is filtered to a single encounter, in which
    /// case scores are raw DPS rather than percentiles.
    #[must_use]
    pub fn is_boss_specific(&self) -> bool {
        self.boss_name.as_deref().is_some_and(|b| !b.is_empty())
            || self.url.as_deref().is_some_and(|u| u.contains("boss="))
    }
}
