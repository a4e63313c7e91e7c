//! Agent records and their attribute model.
//!
//! - [`AgentId`]: sequential identifier, `0` reserved as the "not found"
//!   sentinel
//! - [`Dna`]: the attribute tuple rolled at creation and grown on level-up
//! - [`Agent`]: the complete progression record
//!
//! The arithmetic that creates and grows agents lives in [`progression`].
//!
//! # Example
//!
//! ```
//! use arena_core::agent::{Agent, AgentId};
//!
//! let missing = Agent::sentinel();
//! assert!(missing.is_sentinel());
//! assert_eq!(missing.id, AgentId::NONE);
//! ```

pub mod progression;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::items::ItemId;

pub use progression::{xp_to_level_up, LevelGains};

/// Unique identifier for an agent.
///
/// Ids are assigned sequentially from 1. [`AgentId::NONE`] (0) never names a
/// stored agent; it is what lookups of unknown ids return.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// The sentinel id.
    pub const NONE: Self = Self(0);

    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns true for the sentinel id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<AgentId> for u64 {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

/// Number of elemental affinities.
pub const AFFINITY_COUNT: u8 = 5;

/// Attribute tuple of an agent.
///
/// Strength, agility and intelligence start in `[25, 74]` and only ever
/// grow. The elemental affinity is in `[0, 4]` and never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dna {
    /// Offensive stat; also feeds battle health.
    pub strength: u32,
    /// Defensive stat.
    pub agility: u32,
    /// Flat contribution to power score.
    pub intelligence: u32,
    /// Elemental affinity in `[0, 4]`.
    pub elemental_affinity: u8,
}

impl Dna {
    /// Returns true when this affinity has the advantage over `other`.
    ///
    /// Affinities form a cycle: `x` beats `(x + 1) mod 5`.
    #[must_use]
    pub fn beats(&self, other: &Dna) -> bool {
        (self.elemental_affinity + 1) % AFFINITY_COUNT == other.elemental_affinity
    }

    /// Applies level-up gains to the three growable stats.
    pub(crate) fn grow(&mut self, gains: LevelGains) {
        self.strength = self.strength.saturating_add(gains.strength);
        self.agility = self.agility.saturating_add(gains.agility);
        self.intelligence = self.intelligence.saturating_add(gains.intelligence);
    }
}

/// Progression record of a single agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Identifier; [`AgentId::NONE`] only on the sentinel.
    pub id: AgentId,
    /// Current level, starting at 1.
    pub level: u32,
    /// Cumulative experience; never deducted.
    pub experience: u64,
    /// Opaque handle to off-core metadata.
    pub metadata_reference: String,
    /// Equipped item, or [`ItemId::NONE`].
    pub equipped_item: ItemId,
    /// Attributes.
    pub dna: Dna,
}

impl Agent {
    /// Creates a fresh level-1 agent.
    #[must_use]
    pub fn new(id: AgentId, metadata_reference: impl Into<String>, dna: Dna) -> Self {
        Self {
            id,
            level: 1,
            experience: 0,
            metadata_reference: metadata_reference.into(),
            equipped_item: ItemId::NONE,
            dna,
        }
    }

    /// The "not found" record: every field zeroed.
    #[must_use]
    pub fn sentinel() -> Self {
        Self::default()
    }

    /// Returns true if this is the "not found" record.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.id.is_none()
    }

    /// Health an agent brings into a battle started now.
    #[must_use]
    pub fn battle_health(&self) -> u64 {
        u64::from(self.level) * 20 + u64::from(self.dna.strength) * 5
    }

    /// Experience required to leave the current level.
    #[must_use]
    pub fn next_level_requirement(&self) -> u64 {
        xp_to_level_up(self.level)
    }

    /// Returns true if a level-up would currently succeed.
    #[must_use]
    pub fn can_level_up(&self) -> bool {
        !self.is_sentinel() && self.experience >= self.next_level_requirement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dna(strength: u32, affinity: u8) -> Dna {
        Dna {
            strength,
            agility: 30,
            intelligence: 40,
            elemental_affinity: affinity,
        }
    }

    mod id_tests {
        use super::*;

        #[test]
        fn sentinel_id_is_zero() {
            assert!(AgentId::NONE.is_none());
            assert!(!AgentId::new(1).is_none());
            assert_eq!(AgentId::default(), AgentId::NONE);
        }

        #[test]
        fn ids_order_numerically() {
            assert!(AgentId::new(1) < AgentId::new(2));
            assert_eq!(u64::from(AgentId::new(9)), 9);
        }
    }

    mod agent_tests {
        use super::*;

        #[test]
        fn new_agent_starts_at_level_one() {
            let agent = Agent::new(AgentId::new(1), "QmTestCID123", dna(50, 0));
            assert_eq!(agent.level, 1);
            assert_eq!(agent.experience, 0);
            assert_eq!(agent.equipped_item, ItemId::NONE);
            assert_eq!(agent.metadata_reference, "QmTestCID123");
            assert!(!agent.is_sentinel());
        }

        #[test]
        fn sentinel_is_all_zero() {
            let agent = Agent::sentinel();
            assert!(agent.is_sentinel());
            assert_eq!(agent.level, 0);
            assert_eq!(agent.dna, Dna::default());
            assert!(!agent.can_level_up());
        }

        #[test]
        fn battle_health_uses_level_and_strength() {
            let mut agent = Agent::new(AgentId::new(1), "", dna(40, 0));
            assert_eq!(agent.battle_health(), 20 + 200);
            agent.level = 3;
            assert_eq!(agent.battle_health(), 60 + 200);
        }

        #[test]
        fn can_level_up_tracks_threshold() {
            let mut agent = Agent::new(AgentId::new(1), "", dna(40, 0));
            agent.experience = 99;
            assert!(!agent.can_level_up());
            agent.experience = 100;
            assert!(agent.can_level_up());
        }

        #[test]
        fn agent_is_serializable() {
            let agent = Agent::new(AgentId::new(4), "cid", dna(33, 2));
            let json = serde_json::to_string(&agent).unwrap();
            let back: Agent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, agent);
        }
    }

    mod affinity_tests {
        use super::*;

        #[test]
        fn affinities_form_a_cycle() {
            assert!(dna(0, 0).beats(&dna(0, 1)));
            assert!(dna(0, 4).beats(&dna(0, 0)));
            assert!(!dna(0, 1).beats(&dna(0, 0)));
            assert!(!dna(0, 2).beats(&dna(0, 2)));
        }

        #[test]
        fn grow_saturates() {
            let mut d = dna(u32::MAX - 1, 0);
            d.grow(LevelGains {
                strength: 4,
                agility: 2,
                intelligence: 3,
            });
            assert_eq!(d.strength, u32::MAX);
            assert_eq!(d.agility, 32);
            assert_eq!(d.intelligence, 43);
            assert_eq!(d.elemental_affinity, 0);
        }
    }
}
