//! Eight-player party composition estimate against a boss DPS check.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::jobs::JobRecord;
use crate::roles::{classify, RoleGroup};
use crate::stats::parse_stat;

pub const PARTY_SIZE: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum PartyError {
    #[error("a party needs exactly 8 members, got {0}")]
    WrongSize(usize),

    #[error("job \"{0}\" does not belong to any role")]
    UnknownJob(String),

    #[error("damage threshold must be a finite, non-negative number (got {0})")]
    InvalidThreshold(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub melee: usize,
    pub caster: usize,
    pub ranged: usize,
    pub tank: usize,
    pub healer: usize,
}

impl RoleCounts {
    #[must_use]
    pub fn dps(&self) -> usize {
        self.melee + self.caster + self.ranged
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyEstimate {
    pub total_dps: f64,
    pub threshold: f64,
    pub meets_threshold: bool,
    /// `total_dps - threshold`; negative when short.
    pub margin: f64,
    pub standard_composition: bool,
    pub roles: RoleCounts,
    /// Members whose score did not parse and were counted as zero.
    pub unparsed_members: Vec<String>,
}

/// A validated party of eight classified members.
#[derive(Debug, Clone)]
pub struct Party {
    members: Vec<(RoleGroup, JobRecord)>,
}

impl Party {
    /// # Errors
    ///
    /// Returns [`PartyError::WrongSize`] unless exactly eight members are
    /// given, or [`PartyError::UnknownJob`] for a member with no role.
    pub fn new(members: Vec<JobRecord>) -> Result<Self, PartyError> {
        if members.len() != PARTY_SIZE {
            return Err(PartyError::WrongSize(members.len()));
        }
        let members = members
            .into_iter()
            .map(|m| match classify(&m.job) {
                Some(role) => Ok((role, m)),
                None => Err(PartyError::UnknownJob(m.job)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { members })
    }

    #[must_use]
    pub fn role_counts(&self) -> RoleCounts {
        let mut counts = RoleCounts::default();
        for (role, _) in &self.members {
            match role {
                RoleGroup::Melee => counts.melee += 1,
                RoleGroup::Caster => counts.caster += 1,
                RoleGroup::Ranged => counts.ranged += 1,
                RoleGroup::Tank => counts.tank += 1,
                RoleGroup::Healer => counts.healer += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn dps_members(&self) -> impl Iterator<Item = &JobRecord> {
        self.members
            .iter()
            .filter(|(role, _)| role.is_dps())
            .map(|(_, member)| member)
    }

    /// Two tanks, two healers, four DPS.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        let counts = self.role_counts();
        counts.tank == 2 && counts.healer == 2 && self.dps_members().count() == 4
    }

    /// Sum member scores as DPS and compare with `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`PartyError::InvalidThreshold`] for a negative or non-finite
    /// threshold.
    pub fn estimate(&self, threshold: f64) -> Result<PartyEstimate, PartyError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PartyError::InvalidThreshold(threshold));
        }

        let mut total_dps = 0.0;
        let mut unparsed_members = Vec::new();
        for (_, member) in &self.members {
            match parse_stat(&member.score) {
                Some(dps) => total_dps += dps,
                None => unparsed_members.push(member.job.clone()),
            }
        }

        Ok(PartyEstimate {
            total_dps,
            threshold,
            meets_threshold: total_dps >= threshold,
            margin: total_dps - threshold,
            standard_composition: self.is_standard(),
            roles: self.role_counts(),
            unparsed_members,
        })
    }
}
