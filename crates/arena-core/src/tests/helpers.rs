//! Test helper functions for setting up arenas and agents.

use std::sync::Arc;

use crate::access::Address;
use crate::agent::AgentId;
use crate::battle::{BattleEngine, Strategy, Tactics};
use crate::entropy::{RandomnessSource, SeededEntropy};
use crate::items::{ItemCatalog, ItemId, ItemLedger, NoItems};
use crate::registry::AgentRegistry;

/// Registry administrator used throughout the scenarios.
pub const ADMIN: Address = Address::new(0xAD);

/// Identity the engine acts under.
pub const ENGINE: Address = Address::new(0xE7);

/// Tactics used for the first participant of a scenario battle.
pub fn bold() -> Tactics {
    Tactics::new(60, Strategy::Direct, 50)
}

/// Tactics used for the second participant of a scenario battle.
pub fn careful() -> Tactics {
    Tactics::new(50, Strategy::Counter, 30)
}

/// Builds an authorized engine with `agents` minted.
///
/// Creation events are drained so scenarios start from an empty log.
pub fn arena_with(
    agents: usize,
    entropy: Arc<dyn RandomnessSource>,
    items: Arc<dyn ItemLedger>,
) -> BattleEngine {
    let mut registry = AgentRegistry::new(ADMIN, Arc::clone(&entropy));
    registry
        .set_authorized_battle_caller(ADMIN, ENGINE)
        .expect("admin may wire the engine");
    for i in 0..agents {
        registry
            .create_agent(format!("agent-{}", i + 1))
            .expect("seeded entropy never fails");
    }
    registry.take_events();
    BattleEngine::new(ENGINE, registry, items, entropy)
}

/// Seeded arena without items.
pub fn seeded_arena(agents: usize, seed: u64) -> BattleEngine {
    arena_with(agents, Arc::new(SeededEntropy::new(seed)), Arc::new(NoItems))
}

/// Catalog with one modest and one overwhelming item.
pub fn catalog() -> ItemCatalog {
    ItemCatalog::new()
        .with_item(ItemId::new(1), 40)
        .with_item(ItemId::new(2), 1_000_000)
}

/// Shorthand for an agent id.
pub fn agent(raw: u64) -> AgentId {
    AgentId::new(raw)
}

/// Starts and resolves one battle, returning the winner.
pub fn duel(engine: &mut BattleEngine, a: AgentId, b: AgentId) -> AgentId {
    let battle = engine
        .start_battle(a, bold(), b, careful())
        .expect("both agents idle");
    engine.fight(battle).expect("battle resolves").winner
}
