//! # Arena Core
//!
//! Ledger and battle engine for Agent Arena.
//!
//! Agents are minted with random attributes, grow through experience and
//! levels, and meet in two-agent battles whose winner is decided by a power
//! score with a bounded random term. Every state change happens through a
//! checked operation that either succeeds completely or leaves the ledger
//! untouched.
//!
//! ## Architecture
//!
//! - **Registry** ([`registry`]): agent records, progression, item
//!   equipping and the admin-controlled role wiring
//! - **Engine** ([`battle`]): battle lifecycle, agent locking, scoring and
//!   victory rewards
//! - **Capabilities**: randomness ([`entropy`]) and item power ([`items`])
//!   are injected as trait objects
//! - **Persistence** ([`snapshot`]): serializable image of the whole ledger
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use arena_core::{AgentRegistry, Address, BattleEngine, NoItems, SeededEntropy, Tactics};
//!
//! let admin = Address::new(1);
//! let engine_identity = Address::new(2);
//! let entropy = Arc::new(SeededEntropy::new(7));
//!
//! let mut registry = AgentRegistry::new(admin, entropy.clone());
//! registry.set_authorized_battle_caller(admin, engine_identity)?;
//! let a = registry.create_agent("a")?;
//! let b = registry.create_agent("b")?;
//!
//! let mut engine = BattleEngine::new(engine_identity, registry, Arc::new(NoItems), entropy);
//! let battle = engine.start_battle(a, Tactics::default(), b, Tactics::default())?;
//! let outcome = engine.fight(battle)?;
//! assert_eq!(engine.registry().get_agent(outcome.winner).experience, 50);
//! # Ok::<(), arena_core::ArenaError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod access;
pub mod agent;
pub mod battle;
pub mod config;
pub mod entropy;
pub mod error;
pub mod event;
pub mod items;
pub mod registry;
pub mod snapshot;

pub use access::Address;
pub use agent::{Agent, AgentId, Dna};
pub use battle::{
    ArenaKind, Battle, BattleEngine, BattleId, BattleOutcome, BattleStatus, Strategy, Tactics,
};
pub use config::ArenaConfig;
pub use entropy::{FixedEntropy, RandomnessSource, SeededEntropy, SequenceEntropy};
pub use error::{ArenaError, Result};
pub use event::{Event, EventLog};
pub use items::{ItemCatalog, ItemId, ItemLedger, NoItems};
pub use registry::AgentRegistry;
pub use snapshot::LedgerSnapshot;

#[cfg(test)]
mod tests;
