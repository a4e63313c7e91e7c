//! Notifications emitted for external observers.
//!
//! Each successful state-changing operation appends exactly one [`Event`] to
//! the [`EventLog`] of the component that performed it. Failed operations
//! append nothing. Observers drain the log with [`EventLog::take_events`],
//! typically after each call or batch of calls.
//!
//! Every entry is stamped from a sequence clock. Logs created with
//! [`EventLog::sharing_clock`] draw from the same clock, so entries spread
//! over several components can be put back into emission order with
//! [`EventLog::drain_merged`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agent::AgentId;
use crate::battle::{ArenaKind, BattleId};
use crate::items::ItemId;

/// A notification of a completed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A new agent was minted.
    AgentCreated {
        /// The new agent.
        agent: AgentId,
    },
    /// Experience was credited to an agent.
    ExperienceGained {
        /// Credited agent.
        agent: AgentId,
        /// Amount added.
        amount: u64,
    },
    /// An agent advanced one level.
    LeveledUp {
        /// Agent that leveled.
        agent: AgentId,
        /// Level after the increase.
        new_level: u32,
    },
    /// An agent's equipment slot changed.
    ItemEquipped {
        /// Agent whose slot changed.
        agent: AgentId,
        /// New slot content, [`ItemId::NONE`] when cleared.
        item: ItemId,
    },
    /// A battle was opened.
    BattleStarted {
        /// The new battle.
        battle: BattleId,
        /// First participant.
        agent_a: AgentId,
        /// Second participant.
        agent_b: AgentId,
        /// Arena the battle takes place in.
        arena: ArenaKind,
    },
    /// A battle was resolved.
    BattleFinished {
        /// The resolved battle.
        battle: BattleId,
        /// Winning participant.
        winner: AgentId,
        /// Losing participant.
        loser: AgentId,
    },
}

impl Event {
    /// Short name of the event kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AgentCreated { .. } => "AgentCreated",
            Self::ExperienceGained { .. } => "ExperienceGained",
            Self::LeveledUp { .. } => "LeveledUp",
            Self::ItemEquipped { .. } => "ItemEquipped",
            Self::BattleStarted { .. } => "BattleStarted",
            Self::BattleFinished { .. } => "BattleFinished",
        }
    }
}

/// Append-only, ordered event buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    /// Clock stamp of each entry in `events`.
    stamps: Vec<u64>,
    clock: Arc<AtomicU64>,
}

impl EventLog {
    /// Creates an empty log with its own sequence clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log stamping from the same clock as `self`.
    #[must_use]
    pub fn sharing_clock(&self) -> Self {
        Self {
            events: Vec::new(),
            stamps: Vec::new(),
            clock: Arc::clone(&self.clock),
        }
    }

    pub(crate) fn push(&mut self, event: Event) {
        let seq = self.clock.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(event = event.name(), seq, "event emitted");
        self.stamps.push(seq);
        self.events.push(event);
    }

    /// Events recorded since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Drains and returns all recorded events in emission order.
    pub fn take_events(&mut self) -> Vec<Event> {
        self.stamps.clear();
        std::mem::take(&mut self.events)
    }

    /// Drains all recorded events together with their clock stamps.
    pub fn take_sequenced(&mut self) -> Vec<(u64, Event)> {
        let stamps = std::mem::take(&mut self.stamps);
        stamps.into_iter().zip(std::mem::take(&mut self.events)).collect()
    }

    /// Drains two logs into one list ordered by clock stamp.
    ///
    /// The order is only meaningful when the logs share a clock.
    pub fn drain_merged(first: &mut Self, second: &mut Self) -> Vec<Event> {
        let mut merged = first.take_sequenced();
        merged.extend(second.take_sequenced());
        merged.sort_by_key(|(seq, _)| *seq);
        merged.into_iter().map(|(_, event)| event).collect()
    }

    /// Number of events currently in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
        self.stamps.clear();
    }
}
