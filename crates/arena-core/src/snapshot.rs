//! Serializable image of the whole ledger.
//!
//! A [`LedgerSnapshot`] holds exactly the persisted layout: agent records,
//! battle records, the lock table, the two id counters and the role wiring.
//! Entropy sources and item ledgers are capabilities, not state, and are
//! supplied again on [`BattleEngine::restore`].
//!
//! Restoring re-checks every invariant the operations maintain, including
//! attribute ranges and the health snapshotted into each battle, so a
//! hand-edited or truncated snapshot is rejected with
//! [`ArenaError::CorruptSnapshot`] rather than producing an engine that
//! could double-lock an agent or reuse an id.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access::Address;
use crate::agent::{Agent, AgentId, AFFINITY_COUNT};
use crate::battle::{Battle, BattleEngine, BattleId, BattleStatus};
use crate::config::ArenaConfig;
use crate::entropy::RandomnessSource;
use crate::error::{ArenaError, Result};
use crate::items::ItemLedger;
use crate::registry::AgentRegistry;

/// Persisted ledger layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Registry administrator.
    pub admin: Address,
    /// Identity allowed to credit experience.
    pub authorized_battle_caller: Option<Address>,
    /// Id the next minted agent will receive.
    pub next_agent_id: u64,
    /// Id the next battle will receive.
    pub next_battle_id: u64,
    /// Agent records in id order.
    pub agents: Vec<Agent>,
    /// Battle records in id order.
    pub battles: Vec<Battle>,
    /// Locked agents and the battle holding each lock.
    pub locks: Vec<(AgentId, BattleId)>,
}

fn corrupt(msg: impl Into<String>) -> ArenaError {
    ArenaError::CorruptSnapshot(msg.into())
}

impl LedgerSnapshot {
    /// Checks the snapshot against the ledger invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::CorruptSnapshot`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (i, agent) in self.agents.iter().enumerate() {
            let expected = i as u64 + 1;
            if agent.id.as_u64() != expected {
                return Err(corrupt(format!(
                    "agent at position {i} has id {}, expected {expected}",
                    agent.id
                )));
            }
            if agent.level == 0 {
                return Err(corrupt(format!("agent {} has level 0", agent.id)));
            }
            if agent.dna.elemental_affinity >= AFFINITY_COUNT {
                return Err(corrupt(format!(
                    "agent {} has unknown affinity {}",
                    agent.id, agent.dna.elemental_affinity
                )));
            }
        }
        if self.next_agent_id != self.agents.len() as u64 + 1 {
            return Err(corrupt(format!(
                "next agent id {} does not follow {} agents",
                self.next_agent_id,
                self.agents.len()
            )));
        }

        let known: BTreeMap<AgentId, &Agent> = self.agents.iter().map(|a| (a.id, a)).collect();
        let mut expected_locks = BTreeMap::new();
        for (i, battle) in self.battles.iter().enumerate() {
            if battle.id.as_u64() != i as u64 {
                return Err(corrupt(format!(
                    "battle at position {i} has id {}",
                    battle.id
                )));
            }
            let [a, b] = battle.participants;
            let (Some(agent_a), Some(agent_b)) = (known.get(&a), known.get(&b)) else {
                return Err(corrupt(format!(
                    "battle {} has unknown participants {a} and {b}",
                    battle.id
                )));
            };
            if a == b {
                return Err(corrupt(format!(
                    "battle {} pits agent {a} against itself",
                    battle.id
                )));
            }
            // Level and strength never drop, so a snapshotted health can
            // only be at or below what the agent would bring today.
            for (slot, agent) in [agent_a, agent_b].into_iter().enumerate() {
                let ceiling = agent.battle_health();
                let health = battle.health[slot];
                if health == 0 || health > ceiling {
                    return Err(corrupt(format!(
                        "battle {} records health {health} for agent {}, outside 1..={ceiling}",
                        battle.id, agent.id
                    )));
                }
            }
            match battle.status {
                BattleStatus::Ongoing => {
                    if !battle.winner.is_none() {
                        return Err(corrupt(format!(
                            "ongoing battle {} already has a winner",
                            battle.id
                        )));
                    }
                    for agent in [a, b] {
                        if expected_locks.insert(agent, battle.id).is_some() {
                            return Err(corrupt(format!(
                                "agent {agent} is in more than one ongoing battle"
                            )));
                        }
                    }
                }
                BattleStatus::Finished => {
                    if battle.slot_of(battle.winner).is_none() {
                        return Err(corrupt(format!(
                            "finished battle {} has outsider winner {}",
                            battle.id, battle.winner
                        )));
                    }
                }
            }
        }
        if self.next_battle_id != self.battles.len() as u64 {
            return Err(corrupt(format!(
                "next battle id {} does not follow {} battles",
                self.next_battle_id,
                self.battles.len()
            )));
        }

        let locks: BTreeMap<AgentId, BattleId> = self.locks.iter().copied().collect();
        if locks.len() != self.locks.len() || locks != expected_locks {
            return Err(corrupt("lock table does not match ongoing battles"));
        }
        Ok(())
    }
}

impl BattleEngine {
    /// Captures the engine and its registry.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        let registry = self.registry();
        LedgerSnapshot {
            admin: registry.admin(),
            authorized_battle_caller: registry.authorized_battle_caller(),
            next_agent_id: registry.agent_count() + 1,
            next_battle_id: self.battle_count(),
            agents: registry.records().values().cloned().collect(),
            battles: self.battles().cloned().collect(),
            locks: self
                .lock_table()
                .iter()
                .map(|(agent, battle)| (*agent, *battle))
                .collect(),
        }
    }

    /// Rebuilds an engine and its registry from a snapshot.
    ///
    /// The registry and engine share `entropy`. Event logs start empty.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::CorruptSnapshot`] if the snapshot violates a
    /// ledger invariant or `config` is unusable.
    pub fn restore(
        snapshot: LedgerSnapshot,
        identity: Address,
        items: Arc<dyn ItemLedger>,
        entropy: Arc<dyn RandomnessSource>,
        config: ArenaConfig,
    ) -> Result<Self> {
        snapshot.validate()?;
        let LedgerSnapshot {
            admin,
            authorized_battle_caller,
            next_agent_id,
            agents,
            battles,
            locks,
            ..
        } = snapshot;

        let agents: BTreeMap<AgentId, Agent> = agents.into_iter().map(|a| (a.id, a)).collect();
        info!(
            agents = agents.len(),
            battles = battles.len(),
            locked = locks.len(),
            "ledger restored"
        );
        let registry = AgentRegistry::from_records(
            admin,
            authorized_battle_caller,
            Arc::clone(&entropy),
            agents,
            next_agent_id - 1,
        );
        Self::from_parts(
            identity,
            registry,
            items,
            entropy,
            battles,
            locks.into_iter().collect(),
        )
        .with_config(config)
        .map_err(|e| corrupt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::Tactics;
    use crate::entropy::SeededEntropy;
    use crate::items::NoItems;

    const ADMIN: Address = Address::new(0xAD);
    const ARENA: Address = Address::new(0xA7);

    fn populated() -> BattleEngine {
        let entropy: Arc<dyn RandomnessSource> = Arc::new(SeededEntropy::new(7));
        let mut registry = AgentRegistry::new(ADMIN, Arc::clone(&entropy));
        registry.set_authorized_battle_caller(ADMIN, ARENA).unwrap();
        for i in 0..4 {
            registry.create_agent(format!("cid-{i}")).unwrap();
        }
        let mut engine = BattleEngine::new(ARENA, registry, Arc::new(NoItems), entropy);
        let first = engine
            .start_battle(AgentId::new(1), Tactics::default(), AgentId::new(2), Tactics::default())
            .unwrap();
        engine.fight(first).unwrap();
        engine
            .start_battle(AgentId::new(3), Tactics::default(), AgentId::new(4), Tactics::default())
            .unwrap();
        engine
    }

    fn restore(snapshot: LedgerSnapshot) -> Result<BattleEngine> {
        BattleEngine::restore(
            snapshot,
            ARENA,
            Arc::new(NoItems),
            Arc::new(SeededEntropy::new(99)),
            ArenaConfig::default(),
        )
    }

    #[test]
    fn snapshot_captures_counters_and_locks() {
        let snapshot = populated().snapshot();
        assert_eq!(snapshot.next_agent_id, 5);
        assert_eq!(snapshot.next_battle_id, 2);
        assert_eq!(snapshot.agents.len(), 4);
        assert_eq!(
            snapshot.locks,
            vec![
                (AgentId::new(3), BattleId::new(1)),
                (AgentId::new(4), BattleId::new(1))
            ]
        );
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn restore_reproduces_the_ledger() {
        let engine = populated();
        let snapshot = engine.snapshot();
        let restored = restore(snapshot.clone()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert!(restored.is_agent_in_battle(AgentId::new(3)));
        assert_eq!(restored.registry().agent_count(), 4);
    }

    #[test]
    fn restored_engine_continues_numbering() {
        let mut restored = restore(populated().snapshot()).unwrap();
        restored.fight(BattleId::new(1)).unwrap();
        let next = restored.registry_mut().create_agent("late").unwrap();
        assert_eq!(next, AgentId::new(5));
        let battle = restored
            .start_battle(AgentId::new(5), Tactics::default(), AgentId::new(1), Tactics::default())
            .unwrap();
        assert_eq!(battle, BattleId::new(2));
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = populated().snapshot();
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    mod corruption_tests {
        use super::*;

        #[test]
        fn rejects_counter_mismatch() {
            let mut snapshot = populated().snapshot();
            snapshot.next_agent_id = 3;
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_missing_lock() {
            let mut snapshot = populated().snapshot();
            snapshot.locks.pop();
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_stale_lock() {
            let mut snapshot = populated().snapshot();
            snapshot.locks.push((AgentId::new(1), BattleId::new(0)));
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_outsider_winner() {
            let mut snapshot = populated().snapshot();
            snapshot.battles[0].winner = AgentId::new(4);
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_unknown_affinity() {
            let mut snapshot = populated().snapshot();
            snapshot.agents[2].dna.elemental_affinity = 9;
            let err = restore(snapshot).unwrap_err();
            assert!(matches!(&err, ArenaError::CorruptSnapshot(msg) if msg.contains("affinity")));
        }

        #[test]
        fn rejects_inflated_battle_health() {
            let mut snapshot = populated().snapshot();
            snapshot.battles[1].health[0] += 1;
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_zero_battle_health() {
            let mut snapshot = populated().snapshot();
            snapshot.battles[0].health[1] = 0;
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_gap_in_agent_ids() {
            let mut snapshot = populated().snapshot();
            snapshot.agents.remove(1);
            snapshot.next_agent_id = 4;
            assert!(matches!(restore(snapshot), Err(ArenaError::CorruptSnapshot(_))));
        }

        #[test]
        fn rejects_unusable_config() {
            let result = BattleEngine::restore(
                populated().snapshot(),
                ARENA,
                Arc::new(NoItems),
                Arc::new(SeededEntropy::new(1)),
                ArenaConfig::default().with_luck_ceiling(0),
            );
            assert!(matches!(result, Err(ArenaError::CorruptSnapshot(_))));
        }
    }
}
