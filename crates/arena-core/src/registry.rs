//! Agent registry: minting, experience, levels and equipment.
//!
//! The registry owns every [`Agent`] record. Ids are handed out sequentially
//! from 1 and records are never removed, so `agent_count()` doubles as the
//! highest assigned id.
//!
//! # Roles
//!
//! - The **administrator** (fixed at construction) may rewire the authorized
//!   battle caller and the randomness source.
//! - The **authorized battle caller** is the only identity allowed to credit
//!   experience. In a wired system this is the battle engine's identity.
//! - Everyone else may mint, level up and equip. Level-up and equip perform
//!   no ownership check.
//!
//! # Lookups
//!
//! [`AgentRegistry::get_agent`] is a soft lookup: an unknown id yields the
//! sentinel record (id 0) instead of an error, and callers branch on
//! [`Agent::is_sentinel`]. Crediting experience and levelling up an unknown
//! id fail with [`ArenaError::AgentNotFound`]. Equipping an unknown id
//! succeeds, emits its event and stores nothing.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use arena_core::access::Address;
//! use arena_core::entropy::FixedEntropy;
//! use arena_core::agent::AgentId;
//! use arena_core::registry::AgentRegistry;
//!
//! let admin = Address::new(1);
//! let mut registry = AgentRegistry::new(admin, Arc::new(FixedEntropy::new(12345)));
//! let id = registry.create_agent("QmAgentCID").unwrap();
//!
//! let agent = registry.get_agent(id);
//! assert_eq!(agent.level, 1);
//! assert!(registry.get_agent(AgentId::new(999)).is_sentinel());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::access::Address;
use crate::agent::progression::roll_dna;
use crate::agent::{Agent, AgentId, LevelGains};
use crate::entropy::RandomnessSource;
use crate::error::{ArenaError, Result};
use crate::event::{Event, EventLog};
use crate::items::ItemId;

/// Owner of all agent records.
pub struct AgentRegistry {
    /// Records keyed by id; iteration is in id order.
    agents: BTreeMap<AgentId, Agent>,
    /// Number of agents ever minted, equal to the last assigned id.
    agent_count: u64,
    /// Identity allowed to change role wiring.
    admin: Address,
    /// Identity allowed to credit experience, once configured.
    battle_caller: Option<Address>,
    /// Entropy for attribute rolls.
    entropy: Arc<dyn RandomnessSource>,
    /// Notifications for observers.
    events: EventLog,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.agents.len())
            .field("agent_count", &self.agent_count)
            .field("admin", &self.admin)
            .field("battle_caller", &self.battle_caller)
            .field("events", &self.events.event_count())
            .finish_non_exhaustive()
    }
}

impl AgentRegistry {
    /// Creates an empty registry administered by `admin`.
    ///
    /// No battle caller is authorized until the administrator calls
    /// [`AgentRegistry::set_authorized_battle_caller`].
    #[must_use]
    pub fn new(admin: Address, entropy: Arc<dyn RandomnessSource>) -> Self {
        Self {
            agents: BTreeMap::new(),
            agent_count: 0,
            admin,
            battle_caller: None,
            entropy,
            events: EventLog::new(),
        }
    }

    /// Rebuilds a registry from stored records.
    pub(crate) fn from_records(
        admin: Address,
        battle_caller: Option<Address>,
        entropy: Arc<dyn RandomnessSource>,
        agents: BTreeMap<AgentId, Agent>,
        agent_count: u64,
    ) -> Self {
        Self {
            agents,
            agent_count,
            admin,
            battle_caller,
            entropy,
            events: EventLog::new(),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The administrator identity.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// The identity allowed to credit experience, if configured.
    #[must_use]
    pub fn authorized_battle_caller(&self) -> Option<Address> {
        self.battle_caller
    }

    /// Number of agents ever minted.
    #[must_use]
    pub fn agent_count(&self) -> u64 {
        self.agent_count
    }

    /// Returns a copy of the agent, or the sentinel for unknown ids.
    #[must_use]
    pub fn get_agent(&self, id: AgentId) -> Agent {
        self.agents.get(&id).cloned().unwrap_or_default()
    }

    /// Borrowing lookup; `None` for unknown ids.
    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// All agents in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Notifications emitted so far.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drains the notification log.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub(crate) fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Mints a new level-1 agent with rolled attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::RandomnessUnavailable`] if the entropy draw
    /// fails; the id counter is left untouched.
    pub fn create_agent(&mut self, metadata_reference: impl Into<String>) -> Result<AgentId> {
        let entropy = self.entropy.draw()?;
        let dna = roll_dna(entropy);

        self.agent_count += 1;
        let id = AgentId::new(self.agent_count);
        self.agents.insert(id, Agent::new(id, metadata_reference, dna));

        info!(
            agent = %id,
            strength = dna.strength,
            agility = dna.agility,
            intelligence = dna.intelligence,
            affinity = dna.elemental_affinity,
            "agent created"
        );
        self.events.push(Event::AgentCreated { agent: id });
        Ok(id)
    }

    /// Credits `amount` experience to an agent.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::NotAuthorized`] unless `caller` is the authorized
    ///   battle caller
    /// - [`ArenaError::AgentNotFound`] for unknown ids
    pub fn gain_experience(&mut self, caller: Address, id: AgentId, amount: u64) -> Result<()> {
        if self.battle_caller != Some(caller) {
            warn!(%caller, agent = %id, "rejected experience credit");
            return Err(ArenaError::NotAuthorized {
                caller,
                action: "gain experience",
            });
        }
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or(ArenaError::AgentNotFound(id))?;

        agent.experience = agent.experience.saturating_add(amount);
        debug!(agent = %id, amount, total = agent.experience, "experience gained");
        self.events.push(Event::ExperienceGained { agent: id, amount });
        Ok(())
    }

    /// Advances an agent one level and grows its stats by `[2, 4]` each.
    ///
    /// Experience is cumulative and is not deducted. Returns the new level.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AgentNotFound`] for unknown ids
    /// - [`ArenaError::InsufficientExperience`] below the level threshold
    /// - [`ArenaError::RandomnessUnavailable`] if the entropy draw fails
    pub fn level_up(&mut self, id: AgentId) -> Result<u32> {
        let agent = self.agents.get(&id).ok_or(ArenaError::AgentNotFound(id))?;
        let required = agent.next_level_requirement();
        if agent.experience < required {
            return Err(ArenaError::InsufficientExperience {
                agent: id,
                experience: agent.experience,
                required,
            });
        }

        let gains = LevelGains::roll(self.entropy.draw()?);
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or(ArenaError::AgentNotFound(id))?;
        agent.level += 1;
        agent.dna.grow(gains);
        let new_level = agent.level;

        info!(agent = %id, level = new_level, ?gains, "agent leveled up");
        self.events.push(Event::LeveledUp {
            agent: id,
            new_level,
        });
        Ok(new_level)
    }

    /// Sets the equipment slot; [`ItemId::NONE`] clears it.
    ///
    /// The item is not checked against the item registry, and neither is the
    /// agent: an unknown id still emits [`Event::ItemEquipped`] but no record
    /// is created, so [`get_agent`](Self::get_agent) keeps returning the
    /// sentinel for it.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` matches the other mutating operations.
    pub fn set_equipped_item(&mut self, id: AgentId, item: ItemId) -> Result<()> {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.equipped_item = item;
            debug!(agent = %id, %item, "item equipped");
        } else {
            debug!(agent = %id, %item, "item equipped on unknown agent, nothing stored");
        }
        self.events.push(Event::ItemEquipped { agent: id, item });
        Ok(())
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Authorizes `battle_caller` to credit experience.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NotAuthorized`] unless `caller` is the admin.
    pub fn set_authorized_battle_caller(
        &mut self,
        caller: Address,
        battle_caller: Address,
    ) -> Result<()> {
        self.require_admin(caller, "set authorized battle caller")?;
        info!(%battle_caller, "authorized battle caller updated");
        self.battle_caller = Some(battle_caller);
        Ok(())
    }

    /// Replaces the randomness source used for attribute rolls.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NotAuthorized`] unless `caller` is the admin.
    pub fn set_randomness_source(
        &mut self,
        caller: Address,
        source: Arc<dyn RandomnessSource>,
    ) -> Result<()> {
        self.require_admin(caller, "set randomness source")?;
        info!("registry randomness source replaced");
        self.entropy = source;
        Ok(())
    }

    fn require_admin(&self, caller: Address, action: &'static str) -> Result<()> {
        if caller == self.admin {
            Ok(())
        } else {
            warn!(%caller, action, "rejected administrative call");
            Err(ArenaError::NotAuthorized { caller, action })
        }
    }

    pub(crate) fn records(&self) -> &BTreeMap<AgentId, Agent> {
        &self.agents
    }
}
