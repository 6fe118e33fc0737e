use serde::{Deserialize, Serialize};

/// Raid tiers the statistics endpoint accepts. Any other zone id is rejected
/// before acquisition starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum Zone {
    Ultimate,
    Savage,
}

const SAVAGE_BOSSES: [u32; 4] = [97, 98, 99, 100];

impl Zone {
    pub const ALL: [Zone; 2] = [Zone::Ultimate, Zone::Savage];

    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            65 => Some(Zone::Ultimate),
            68 => Some(Zone::Savage),
            _ => None,
        }
    }

    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Zone::Ultimate => 65,
            Zone::Savage => 68,
        }
    }

    /// Name shown when the statistics page carried no zone or boss label.
    #[must_use]
    pub fn fallback_name(self) -> String {
        format!("Zone {} (Endwalker Raid)", self.id())
    }

    /// Encounter ids the dashboard offers for this zone. Boss ids are not
    /// validated against this list.
    #[must_use]
    pub fn known_bosses(self) -> &'static [u32] {
        match self {
            Zone::Savage => &SAVAGE_BOSSES,
            Zone::Ultimate => &[],
        }
    }
}

impl From<Zone> for u32 {
    fn from(zone: Zone) -> Self {
        zone.id()
    }
}

impl TryFrom<u32> for Zone {
    type Error = String;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Zone::from_id(id).ok_or_else(|| format!("unsupported zone id {id}"))
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_65_and_68() {
        assert_eq!(Zone::from_id(65), Some(Zone::Ultimate));
        assert_eq!(Zone::from_id(68), Some(Zone::Savage));
        assert_eq!(Zone::from_id(66), None);
        assert_eq!(Zone::from_id(0), None);
    }

    #[test]
    fn id_round_trips() {
        for zone in Zone::ALL {
            assert_eq!(Zone::from_id(zone.id()), Some(zone));
        }
    }

    #[test]
    fn fallback_name_mentions_zone_id() {
        assert_eq!(Zone::Savage.fallback_name(), "Zone 68 (Endwalker Raid)");
    }

    #[test]
    fn deserialize_rejects_unknown_zone() {
        assert!(serde_json::from_str::<Zone>("68").is_ok());
        assert!(serde_json::from_str::<Zone>("70").is_err());
    }
}
