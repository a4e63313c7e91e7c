//! Round-based tournament over a single seeded ledger.
//!
//! Each round lines up the idle agents, opens a battle for every adjacent
//! pair, resolves them, and then levels up every agent as far as its
//! experience allows. The line-up keeps the lowest id in front and rotates
//! everyone behind it by one place per round, so opponents change from
//! round to round. With an odd count the agent at the back sits out.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use arena_core::{
    AgentId, AgentRegistry, Address, ArenaError, Battle, BattleEngine, BattleOutcome, Dna,
    ItemId, LedgerSnapshot, SeededEntropy, Strategy, Tactics,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::SimConfig;

/// Registry administrator of a simulated ledger.
pub const ADMIN: Address = Address::new(0xAD);
/// Identity the simulated engine acts under.
pub const ENGINE: Address = Address::new(0xE7);

/// Win/loss tally of one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Battles won.
    pub wins: u32,
    /// Battles lost.
    pub losses: u32,
}

/// Final table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Agent id.
    pub agent: AgentId,
    /// Level reached.
    pub level: u32,
    /// Cumulative experience.
    pub experience: u64,
    /// Battles won.
    pub wins: u32,
    /// Battles lost.
    pub losses: u32,
    /// Final attributes.
    pub dna: Dna,
    /// Item held.
    pub equipped_item: ItemId,
}

/// Summary printed after a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentReport {
    /// Seed the run used.
    pub seed: u64,
    /// Rounds played.
    pub rounds: u32,
    /// Agents ranked by wins, then experience, then id.
    pub standings: Vec<Standing>,
    /// Every battle in id order.
    pub battles: Vec<Battle>,
}

/// A tournament in progress.
#[derive(Debug)]
pub struct Tournament {
    engine: BattleEngine,
    records: BTreeMap<AgentId, Record>,
    seed: u64,
    rounds_played: u32,
}

impl Tournament {
    /// Mints the agents, hands out items and wires the engine.
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid or minting fails.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate().context("tournament config rejected")?;
        let entropy = Arc::new(SeededEntropy::new(config.seed));
        let mut registry = AgentRegistry::new(ADMIN, entropy.clone());
        registry.set_authorized_battle_caller(ADMIN, ENGINE)?;

        let catalog = config.catalog();
        let items: Vec<ItemId> = catalog.ids().collect();
        let mut handout = items.iter().copied().cycle();
        let mut records = BTreeMap::new();
        for i in 0..config.agents {
            let id = registry.create_agent(format!("sim-agent-{}", i + 1))?;
            if let Some(item) = handout.next() {
                registry.set_equipped_item(id, item)?;
            }
            records.insert(id, Record::default());
        }
        info!(
            seed = config.seed,
            agents = config.agents,
            items = items.len(),
            "tournament ledger ready"
        );

        let engine = BattleEngine::new(ENGINE, registry, Arc::new(catalog), entropy)
            .with_config(config.arena)
            .context("arena config rejected")?;
        Ok(Self {
            engine,
            records,
            seed: config.seed,
            rounds_played: 0,
        })
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &BattleEngine {
        &self.engine
    }

    /// Win/loss tally of an agent.
    #[must_use]
    pub fn record(&self, agent: AgentId) -> Record {
        self.records.get(&agent).copied().unwrap_or_default()
    }

    /// Plays one round and returns its outcomes in battle id order.
    ///
    /// # Errors
    ///
    /// Propagates any engine or registry rejection.
    pub fn play_round(&mut self) -> Result<Vec<BattleOutcome>, ArenaError> {
        let round = self.rounds_played;
        let idle: Vec<AgentId> = self
            .engine
            .registry()
            .agents()
            .map(|agent| agent.id)
            .filter(|id| !self.engine.is_agent_in_battle(*id))
            .collect();

        let lineup = pairing_order(&idle, round);
        let mut battles = Vec::with_capacity(lineup.len() / 2);
        for pair in lineup.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            battles.push(self.engine.start_battle(
                a,
                tactics_for(a, round),
                b,
                tactics_for(b, round),
            )?);
        }

        let mut outcomes = Vec::with_capacity(battles.len());
        for battle in battles {
            let outcome = self.engine.fight(battle)?;
            self.records.entry(outcome.winner).or_default().wins += 1;
            self.records.entry(outcome.loser).or_default().losses += 1;
            outcomes.push(outcome);
        }

        let mut level_ups = 0;
        for id in idle {
            while self
                .engine
                .registry()
                .agent(id)
                .is_some_and(|agent| agent.can_level_up())
            {
                self.engine.registry_mut().level_up(id)?;
                level_ups += 1;
            }
        }

        let drained = self.engine.take_all_events();
        debug!(events = drained.len(), "round events drained");

        self.rounds_played += 1;
        info!(
            round = self.rounds_played,
            battles = outcomes.len(),
            level_ups,
            "round complete"
        );
        Ok(outcomes)
    }

    /// Plays `rounds` rounds.
    ///
    /// # Errors
    ///
    /// Stops at the first failing round.
    pub fn play(&mut self, rounds: u32) -> Result<()> {
        for _ in 0..rounds {
            let round = self.rounds_played + 1;
            self.play_round()
                .with_context(|| format!("round {round} failed"))?;
        }
        Ok(())
    }

    /// Standings and battle history so far.
    #[must_use]
    pub fn report(&self) -> TournamentReport {
        let mut standings: Vec<Standing> = self
            .engine
            .registry()
            .agents()
            .map(|agent| {
                let record = self.record(agent.id);
                Standing {
                    agent: agent.id,
                    level: agent.level,
                    experience: agent.experience,
                    wins: record.wins,
                    losses: record.losses,
                    dna: agent.dna,
                    equipped_item: agent.equipped_item,
                }
            })
            .collect();
        standings.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then(b.experience.cmp(&a.experience))
                .then(a.agent.cmp(&b.agent))
        });
        TournamentReport {
            seed: self.seed,
            rounds: self.rounds_played,
            standings,
            battles: self.engine.battles().cloned().collect(),
        }
    }

    /// Full ledger snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.engine.snapshot()
    }
}

/// Circle-method line-up: the head stays put, the tail rotates by `round`.
fn pairing_order(idle: &[AgentId], round: u32) -> Vec<AgentId> {
    let mut lineup = idle.to_vec();
    if let Some(tail) = lineup.get_mut(1..) {
        if !tail.is_empty() {
            let shift = round as usize % tail.len();
            tail.rotate_left(shift);
        }
    }
    lineup
}

/// Deterministic tactics that vary by agent and round.
fn tactics_for(agent: AgentId, round: u32) -> Tactics {
    let id = agent.as_u64();
    let round = u64::from(round);
    let strategy = Strategy::from_code(((id + round) % 3) as u8).unwrap_or_default();
    let aggressiveness = ((id * 37 + round * 11) % 101) as u8;
    let risk = ((id * 53 + round * 7) % 101) as u8;
    debug!(agent = %agent, ?strategy, aggressiveness, risk, "tactics chosen");
    Tactics::new(aggressiveness, strategy, risk)
}
