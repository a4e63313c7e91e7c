//! Battle lifecycle: creation, locking, resolution and rewards.
//!
//! The engine owns the [`AgentRegistry`] it fights with, the battle history
//! and the lock table. It acts under its own [`Address`]; the registry's
//! administrator must authorize that address before the engine can credit
//! experience, otherwise [`BattleEngine::fight`] is rejected with
//! [`ArenaError::NotAuthorized`] and nothing changes.
//!
//! # Atomicity
//!
//! Both operations validate, read, and draw all entropy up front. The only
//! fallible step after that is the experience credit, which runs before any
//! battle or lock is touched. An `Err` therefore always leaves the engine and
//! the registry exactly as they were.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use arena_core::access::Address;
//! use arena_core::battle::{BattleEngine, Strategy, Tactics};
//! use arena_core::entropy::SeededEntropy;
//! use arena_core::items::NoItems;
//! use arena_core::registry::AgentRegistry;
//!
//! let admin = Address::new(1);
//! let arena = Address::new(2);
//! let entropy = Arc::new(SeededEntropy::new(42));
//!
//! let mut registry = AgentRegistry::new(admin, entropy.clone());
//! registry.set_authorized_battle_caller(admin, arena).unwrap();
//! let a = registry.create_agent("a").unwrap();
//! let b = registry.create_agent("b").unwrap();
//!
//! let mut engine = BattleEngine::new(arena, registry, Arc::new(NoItems), entropy);
//! let battle = engine
//!     .start_battle(a, Tactics::new(60, Strategy::Direct, 50), b, Tactics::default())
//!     .unwrap();
//! assert!(engine.is_agent_in_battle(a));
//!
//! let outcome = engine.fight(battle).unwrap();
//! assert!(outcome.winner == a || outcome.winner == b);
//! assert!(!engine.is_agent_in_battle(a));
//! assert_eq!(engine.registry().get_agent(outcome.winner).experience, 50);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::score::{pick_winner, power_score, ScoreInputs};
use super::{ArenaKind, Battle, BattleId, BattleStatus, Tactics};
use crate::access::Address;
use crate::agent::{Agent, AgentId};
use crate::config::{ArenaConfig, ConfigError};
use crate::entropy::RandomnessSource;
use crate::error::{ArenaError, Result};
use crate::event::{Event, EventLog};
use crate::items::ItemLedger;
use crate::registry::AgentRegistry;

/// Result of a resolved battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// The resolved battle.
    pub battle: BattleId,
    /// Winning participant.
    pub winner: AgentId,
    /// Losing participant.
    pub loser: AgentId,
    /// Power scores parallel to the battle's participants.
    pub scores: [u64; 2],
    /// Experience credited to the winner.
    pub reward: u64,
}

/// Owner of battle records and the agent lock table.
pub struct BattleEngine {
    /// Identity the engine acts under when crediting experience.
    identity: Address,
    /// Registry of the agents that fight here.
    registry: AgentRegistry,
    /// Item power lookup.
    items: Arc<dyn ItemLedger>,
    /// Entropy for arenas, variance and tie-breaks.
    entropy: Arc<dyn RandomnessSource>,
    /// Tunables.
    config: ArenaConfig,
    /// History indexed by battle id.
    battles: Vec<Battle>,
    /// Agents currently locked, with the battle holding each lock.
    locks: BTreeMap<AgentId, BattleId>,
    /// Notifications for observers.
    events: EventLog,
}

impl fmt::Debug for BattleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleEngine")
            .field("identity", &self.identity)
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("battles", &self.battles.len())
            .field("locks", &self.locks)
            .field("events", &self.events.event_count())
            .finish_non_exhaustive()
    }
}

impl BattleEngine {
    /// Creates an engine with the default [`ArenaConfig`].
    #[must_use]
    pub fn new(
        identity: Address,
        registry: AgentRegistry,
        items: Arc<dyn ItemLedger>,
        entropy: Arc<dyn RandomnessSource>,
    ) -> Self {
        let events = registry.events().sharing_clock();
        Self {
            identity,
            registry,
            items,
            entropy,
            config: ArenaConfig::default(),
            battles: Vec::new(),
            locks: BTreeMap::new(),
            events,
        }
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error of an unusable configuration.
    pub fn with_config(mut self, config: ArenaConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub(crate) fn from_parts(
        identity: Address,
        registry: AgentRegistry,
        items: Arc<dyn ItemLedger>,
        entropy: Arc<dyn RandomnessSource>,
        battles: Vec<Battle>,
        locks: BTreeMap<AgentId, BattleId>,
    ) -> Self {
        Self {
            battles,
            locks,
            ..Self::new(identity, registry, items, entropy)
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Identity the engine acts under.
    #[must_use]
    pub fn identity(&self) -> Address {
        self.identity
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The registry this engine fights with.
    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Mutable access for minting, leveling, equipping and administration.
    pub fn registry_mut(&mut self) -> &mut AgentRegistry {
        &mut self.registry
    }

    /// Consumes the engine, returning its registry.
    #[must_use]
    pub fn into_registry(self) -> AgentRegistry {
        self.registry
    }

    /// Notifications emitted by the engine.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drains the engine's notification log.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// Drains the engine's and the registry's logs as one stream in
    /// emission order.
    pub fn take_all_events(&mut self) -> Vec<Event> {
        EventLog::drain_merged(self.registry.events_mut(), &mut self.events)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Looks up a battle.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::BattleNotFound`] for unassigned ids.
    pub fn get_battle(&self, id: BattleId) -> Result<&Battle> {
        Self::index(id)
            .and_then(|i| self.battles.get(i))
            .ok_or(ArenaError::BattleNotFound(id))
    }

    /// Total battles ever created.
    #[must_use]
    pub fn battle_count(&self) -> u64 {
        self.battles.len() as u64
    }

    /// All battles in id order.
    pub fn battles(&self) -> impl Iterator<Item = &Battle> + '_ {
        self.battles.iter()
    }

    /// Returns true while `agent` is locked by an ongoing battle.
    #[must_use]
    pub fn is_agent_in_battle(&self, agent: AgentId) -> bool {
        self.locks.contains_key(&agent)
    }

    /// The ongoing battle holding `agent`, if any.
    #[must_use]
    pub fn battle_of(&self, agent: AgentId) -> Option<BattleId> {
        self.locks.get(&agent).copied()
    }

    /// Health `agent` was snapshotted with in `battle`.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::BattleNotFound`] for unassigned battle ids
    /// - [`ArenaError::ParticipantNotInBattle`] if `agent` did not take part
    pub fn get_agent_health(&self, battle: BattleId, agent: AgentId) -> Result<u64> {
        self.get_battle(battle)?
            .health_of(agent)
            .ok_or(ArenaError::ParticipantNotInBattle { battle, agent })
    }

    pub(crate) fn lock_table(&self) -> &BTreeMap<AgentId, BattleId> {
        &self.locks
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Opens a battle between two idle agents.
    ///
    /// Draws the arena, snapshots both participants' health from their
    /// current level and strength, and locks both agents.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AgentNotFound`] if either id is unknown
    /// - [`ArenaError::DuplicateParticipant`] if both ids are the same
    /// - [`ArenaError::AgentBusy`] if either agent is already locked
    /// - [`ArenaError::RandomnessUnavailable`] if the arena draw fails
    pub fn start_battle(
        &mut self,
        agent_a: AgentId,
        tactics_a: Tactics,
        agent_b: AgentId,
        tactics_b: Tactics,
    ) -> Result<BattleId> {
        let a = self.existing(agent_a)?;
        let b = self.existing(agent_b)?;
        if agent_a == agent_b {
            return Err(ArenaError::DuplicateParticipant(agent_a));
        }
        for agent in [agent_a, agent_b] {
            if self.is_agent_in_battle(agent) {
                return Err(ArenaError::AgentBusy(agent));
            }
        }
        let health = [a.battle_health(), b.battle_health()];
        let arena = ArenaKind::from_entropy(self.entropy.draw()?);

        let id = BattleId::new(self.battle_count());
        self.battles.push(Battle {
            id,
            participants: [agent_a, agent_b],
            tactics: [tactics_a, tactics_b],
            arena,
            health,
            status: BattleStatus::Ongoing,
            winner: AgentId::NONE,
        });
        self.locks.insert(agent_a, id);
        self.locks.insert(agent_b, id);

        info!(
            battle = %id,
            %agent_a,
            %agent_b,
            %arena,
            health_a = health[0],
            health_b = health[1],
            "battle started"
        );
        self.events.push(Event::BattleStarted {
            battle: id,
            agent_a,
            agent_b,
            arena,
        });
        Ok(id)
    }

    /// Resolves an ongoing battle.
    ///
    /// Scores both participants, picks the winner, credits the victory
    /// reward through the registry, marks the battle finished and releases
    /// both locks.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::BattleNotFound`] for unassigned ids
    /// - [`ArenaError::BattleAlreadyFinished`] if already resolved
    /// - [`ArenaError::RandomnessUnavailable`] if a draw fails
    /// - [`ArenaError::NotAuthorized`] if the registry does not accept this
    ///   engine's identity
    pub fn fight(&mut self, id: BattleId) -> Result<BattleOutcome> {
        let battle = self.get_battle(id)?;
        if !battle.is_ongoing() {
            return Err(ArenaError::BattleAlreadyFinished(id));
        }
        let Battle {
            participants,
            tactics,
            health,
            arena,
            ..
        } = battle.clone();

        let fighters = [self.existing(participants[0])?, self.existing(participants[1])?];
        let entropy = [self.entropy.draw()?, self.entropy.draw()?];
        let scores: [u64; 2] = std::array::from_fn(|slot| {
            let own = &fighters[slot];
            let opponent = &fighters[1 - slot];
            let inputs = ScoreInputs {
                dna: own.dna,
                health: health[slot],
                tactics: tactics[slot],
                item_power: self.items.power_of(own.equipped_item),
                opponent: opponent.dna,
                arena,
                entropy: entropy[slot],
            };
            let score = power_score(&inputs, self.config.luck_ceiling);
            debug!(battle = %id, agent = %own.id, score, "participant scored");
            score
        });

        let winner = pick_winner(
            (participants[0], scores[0]),
            (participants[1], scores[1]),
            || self.entropy.draw(),
        )?;
        let loser = if winner == participants[0] {
            participants[1]
        } else {
            participants[0]
        };
        let reward = self.config.victory_reward;
        self.registry.gain_experience(self.identity, winner, reward)?;

        if let Some(battle) = Self::index(id).and_then(|i| self.battles.get_mut(i)) {
            battle.status = BattleStatus::Finished;
            battle.winner = winner;
        }
        for agent in participants {
            self.locks.remove(&agent);
        }

        info!(battle = %id, %winner, %loser, ?scores, reward, "battle finished");
        self.events.push(Event::BattleFinished {
            battle: id,
            winner,
            loser,
        });
        Ok(BattleOutcome {
            battle: id,
            winner,
            loser,
            scores,
            reward,
        })
    }

    fn existing(&self, id: AgentId) -> Result<Agent> {
        let agent = self.registry.get_agent(id);
        if agent.is_sentinel() {
            Err(ArenaError::AgentNotFound(id))
        } else {
            Ok(agent)
        }
    }

    fn index(id: BattleId) -> Option<usize> {
        usize::try_from(id.as_u64()).ok()
    }
}
