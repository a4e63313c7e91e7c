//! Battle records and the engine that resolves them.
//!
//! A [`Battle`] moves through a two-state machine:
//!
//! ```text
//! Ongoing --fight()--> Finished
//! ```
//!
//! Finished is terminal and battles are never deleted, so the battle list is
//! a permanent history indexed by [`BattleId`].
//!
//! - [`engine`]: [`BattleEngine`], lifecycle and locking
//! - [`score`]: power-score computation and winner selection

pub mod engine;
pub mod score;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agent::AgentId;

pub use engine::{BattleEngine, BattleOutcome};
pub use score::{power_score, ScoreInputs};

/// Sequential battle identifier, starting at 0.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BattleId(u64);

impl BattleId {
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
}

impl fmt::Debug for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BattleId({})", self.0)
    }
}

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BattleId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// How a participant plays the elemental game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Ignores elements entirely.
    #[default]
    Direct,
    /// Plays against the opponent's affinity.
    Counter,
    /// Plays into the arena's element.
    Terrain,
}

impl Strategy {
    /// Numeric code of the strategy.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Direct => 0,
            Self::Counter => 1,
            Self::Terrain => 2,
        }
    }

    /// Parses a numeric code; `None` for codes outside `0..=2`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Direct),
            1 => Some(Self::Counter),
            2 => Some(Self::Terrain),
            _ => None,
        }
    }
}

/// Per-participant battle inputs supplied by the caller.
///
/// Percentages above 100 are accepted and treated as 100 during scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tactics {
    /// Shifts weight from agility toward strength, in percent.
    pub aggressiveness: u8,
    /// Elemental play.
    pub strategy: Strategy,
    /// Scales the random swing term, in percent.
    pub risk_tolerance: u8,
}

impl Tactics {
    /// Creates tactics from their parts.
    #[must_use]
    pub const fn new(aggressiveness: u8, strategy: Strategy, risk_tolerance: u8) -> Self {
        Self {
            aggressiveness,
            strategy,
            risk_tolerance,
        }
    }

    pub(crate) fn aggressiveness_pct(self) -> u64 {
        u64::from(self.aggressiveness.min(100))
    }

    pub(crate) fn risk_pct(self) -> u64 {
        u64::from(self.risk_tolerance.min(100))
    }
}

/// Arena a battle takes place in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArenaKind {
    /// Kind 0.
    Volcano,
    /// Kind 1.
    Tundra,
    /// Kind 2.
    Tempest,
}

impl ArenaKind {
    /// Number of arena kinds.
    pub const COUNT: u64 = 3;

    /// Picks an arena as `entropy mod 3`.
    #[must_use]
    pub const fn from_entropy(entropy: u64) -> Self {
        match entropy % Self::COUNT {
            0 => Self::Volcano,
            1 => Self::Tundra,
            _ => Self::Tempest,
        }
    }

    /// Numeric index in `0..=2`.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Volcano => 0,
            Self::Tundra => 1,
            Self::Tempest => 2,
        }
    }

    /// Returns true when the arena favours the given elemental affinity.
    #[must_use]
    pub const fn favours(self, affinity: u8) -> bool {
        affinity % 3 == self.index()
    }
}

impl fmt::Display for ArenaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volcano => write!(f, "Volcano"),
            Self::Tundra => write!(f, "Tundra"),
            Self::Tempest => write!(f, "Tempest"),
        }
    }
}

/// Lifecycle state of a battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStatus {
    /// Participants are locked, awaiting resolution.
    #[default]
    Ongoing,
    /// Resolved; terminal.
    Finished,
}

/// Permanent record of a two-agent contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    /// Identifier.
    pub id: BattleId,
    /// The two distinct participants, in the order they were supplied.
    pub participants: [AgentId; 2],
    /// Tactics parallel to `participants`.
    pub tactics: [Tactics; 2],
    /// Arena drawn at creation.
    pub arena: ArenaKind,
    /// Health parallel to `participants`, snapshotted at creation.
    pub health: [u64; 2],
    /// Lifecycle state.
    pub status: BattleStatus,
    /// Winner once finished, [`AgentId::NONE`] before.
    pub winner: AgentId,
}

impl Battle {
    /// Returns true while the battle awaits resolution.
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.status == BattleStatus::Ongoing
    }

    /// Slot index of `agent`, if it took part.
    #[must_use]
    pub fn slot_of(&self, agent: AgentId) -> Option<usize> {
        self.participants.iter().position(|p| *p == agent)
    }

    /// Snapshotted health of `agent`, if it took part.
    #[must_use]
    pub fn health_of(&self, agent: AgentId) -> Option<u64> {
        self.slot_of(agent).map(|slot| self.health[slot])
    }

    /// The losing participant once finished.
    #[must_use]
    pub fn loser(&self) -> Option<AgentId> {
        match self.status {
            BattleStatus::Ongoing => None,
            BattleStatus::Finished => self
                .participants
                .iter()
                .copied()
                .find(|p| *p != self.winner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle() -> Battle {
        Battle {
            id: BattleId::new(0),
            participants: [AgentId::new(1), AgentId::new(2)],
            tactics: [Tactics::default(); 2],
            arena: ArenaKind::Volcano,
            health: [270, 300],
            status: BattleStatus::Ongoing,
            winner: AgentId::NONE,
        }
    }

    #[test]
    fn arena_kind_is_entropy_mod_three() {
        assert_eq!(ArenaKind::from_entropy(0), ArenaKind::Volcano);
        assert_eq!(ArenaKind::from_entropy(4), ArenaKind::Tundra);
        assert_eq!(ArenaKind::from_entropy(12345), ArenaKind::Volcano);
        assert_eq!(ArenaKind::from_entropy(u64::MAX).index(), (u64::MAX % 3) as u8);
    }

    #[test]
    fn arena_favours_matching_affinities() {
        assert!(ArenaKind::Volcano.favours(0));
        assert!(ArenaKind::Volcano.favours(3));
        assert!(ArenaKind::Tundra.favours(4));
        assert!(!ArenaKind::Tempest.favours(1));
    }

    #[test]
    fn strategy_codes_round_trip() {
        for strategy in [Strategy::Direct, Strategy::Counter, Strategy::Terrain] {
            assert_eq!(Strategy::from_code(strategy.code()), Some(strategy));
        }
        assert_eq!(Strategy::from_code(3), None);
    }

    #[test]
    fn tactics_percentages_are_clamped() {
        let tactics = Tactics::new(250, Strategy::Direct, 101);
        assert_eq!(tactics.aggressiveness_pct(), 100);
        assert_eq!(tactics.risk_pct(), 100);
    }

    #[test]
    fn health_lookup_by_participant() {
        let battle = battle();
        assert_eq!(battle.health_of(AgentId::new(2)), Some(300));
        assert_eq!(battle.health_of(AgentId::new(3)), None);
        assert_eq!(battle.slot_of(AgentId::new(1)), Some(0));
    }

    #[test]
    fn loser_only_after_finish() {
        let mut battle = battle();
        assert_eq!(battle.loser(), None);
        battle.status = BattleStatus::Finished;
        battle.winner = AgentId::new(2);
        assert_eq!(battle.loser(), Some(AgentId::new(1)));
    }

    #[test]
    fn battle_is_serializable() {
        let battle = battle();
        let json = serde_json::to_string(&battle).unwrap();
        let back: Battle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, battle);
    }
}
