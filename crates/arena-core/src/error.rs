//! Error types for the arena core.
//!
//! Every failure is a rejection of a single operation. Operations validate
//! and draw all their entropy before mutating anything, so an `Err` always
//! leaves the registry and engine exactly as they were before the call.

use thiserror::Error;

use crate::access::Address;
use crate::agent::AgentId;
use crate::battle::BattleId;

/// Errors surfaced by [`AgentRegistry`](crate::registry::AgentRegistry) and
/// [`BattleEngine`](crate::battle::BattleEngine) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    /// The caller lacks the role required for the operation.
    #[error("caller {caller} is not authorized to {action}")]
    NotAuthorized {
        /// Identity that attempted the call.
        caller: Address,
        /// Short name of the rejected operation.
        action: &'static str,
    },

    /// The agent id is the sentinel or was never minted.
    #[error("agent {0} does not exist")]
    AgentNotFound(AgentId),

    /// The battle id has not been assigned.
    #[error("battle {0} does not exist")]
    BattleNotFound(BattleId),

    /// The agent is already locked by an ongoing battle.
    #[error("agent {0} is already in battle")]
    AgentBusy(AgentId),

    /// Both battle slots name the same agent.
    #[error("agent {0} cannot battle itself")]
    DuplicateParticipant(AgentId),

    /// The battle has already been resolved.
    #[error("battle {0} is already finished")]
    BattleAlreadyFinished(BattleId),

    /// The agent has not accumulated enough experience for its next level.
    #[error("agent {agent} has {experience} experience, needs {required} to level up")]
    InsufficientExperience {
        /// Agent that attempted to level up.
        agent: AgentId,
        /// Cumulative experience the agent holds.
        experience: u64,
        /// Threshold for the agent's current level.
        required: u64,
    },

    /// The agent did not take part in the battle.
    #[error("agent {agent} is not a participant in battle {battle}")]
    ParticipantNotInBattle {
        /// Battle that was queried.
        battle: BattleId,
        /// Agent that was looked up.
        agent: AgentId,
    },

    /// The randomness source could not produce a value.
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),

    /// A snapshot failed consistency checks on restore.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Result alias used throughout the arena core.
pub type Result<T> = std::result::Result<T, ArenaError>;
