//! Power-score computation and winner selection.
//!
//! A participant's score is a deterministic function of its DNA, snapshotted
//! health, tactics, equipped item power and the arena, plus a bounded random
//! term drawn fresh for every fight:
//!
//! ```text
//! offense = strength     * (50 + aggressiveness)  / 100
//! guard   = agility      * (150 - aggressiveness) / 100
//! core    = health + offense + guard + intelligence
//! score   = core * elemental% / 100 + item_power + luck + swing
//! luck    = e mod luck_ceiling
//! swing   = ((e >> 8) mod 101) * risk_tolerance / 100
//! ```
//!
//! The elemental percentage depends on the chosen [`Strategy`]:
//!
//! | Strategy  | Condition                              | Percent |
//! |-----------|----------------------------------------|---------|
//! | `Direct`  | always                                 | 100     |
//! | `Counter` | own affinity beats opponent's          | 125     |
//! | `Counter` | opponent's affinity beats own          | 85      |
//! | `Counter` | neither                                | 100     |
//! | `Terrain` | arena favours own affinity             | 125     |
//! | `Terrain` | otherwise                              | 95      |
//!
//! All arithmetic saturates, so oversized item powers cannot overflow.

use crate::agent::{AgentId, Dna};
use crate::battle::{ArenaKind, Strategy, Tactics};
use crate::error::Result;

/// Elemental percentage when the matchup or arena helps.
pub const ADVANTAGE_PCT: u64 = 125;
/// Elemental percentage when the opponent's affinity beats ours.
pub const DISADVANTAGE_PCT: u64 = 85;
/// Elemental percentage for a `Terrain` gamble that does not pay off.
pub const OFF_TERRAIN_PCT: u64 = 95;
/// Largest raw swing before risk scaling.
pub const SWING_RANGE: u64 = 101;

/// Everything a power score depends on besides the luck ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInputs {
    /// The scoring participant's attributes.
    pub dna: Dna,
    /// Health snapshotted at battle start.
    pub health: u64,
    /// The scoring participant's tactics.
    pub tactics: Tactics,
    /// Power of the equipped item, 0 when none.
    pub item_power: u64,
    /// The opponent's attributes.
    pub opponent: Dna,
    /// Arena of the battle.
    pub arena: ArenaKind,
    /// Fresh entropy for this participant.
    pub entropy: u64,
}

/// Elemental percentage for a strategy.
#[must_use]
pub fn elemental_pct(strategy: Strategy, own: &Dna, opponent: &Dna, arena: ArenaKind) -> u64 {
    match strategy {
        Strategy::Direct => 100,
        Strategy::Counter if own.beats(opponent) => ADVANTAGE_PCT,
        Strategy::Counter if opponent.beats(own) => DISADVANTAGE_PCT,
        Strategy::Counter => 100,
        Strategy::Terrain if arena.favours(own.elemental_affinity) => ADVANTAGE_PCT,
        Strategy::Terrain => OFF_TERRAIN_PCT,
    }
}

/// Deterministic part of the score, before item power and randomness.
#[must_use]
pub fn base_score(inputs: &ScoreInputs) -> u64 {
    let aggression = inputs.tactics.aggressiveness_pct();
    let offense = u64::from(inputs.dna.strength).saturating_mul(50 + aggression) / 100;
    let guard = u64::from(inputs.dna.agility).saturating_mul(150 - aggression) / 100;
    let core = inputs
        .health
        .saturating_add(offense)
        .saturating_add(guard)
        .saturating_add(u64::from(inputs.dna.intelligence));
    let pct = elemental_pct(
        inputs.tactics.strategy,
        &inputs.dna,
        &inputs.opponent,
        inputs.arena,
    );
    core.saturating_mul(pct) / 100
}

/// Bounded random part of the score.
///
/// Always below `luck_ceiling + 101`.
#[must_use]
pub fn variance(entropy: u64, risk_pct: u64, luck_ceiling: u64) -> u64 {
    let luck = entropy % luck_ceiling.max(1);
    let swing = ((entropy >> 8) % SWING_RANGE) * risk_pct / 100;
    luck + swing
}

/// Full power score of one participant.
#[must_use]
pub fn power_score(inputs: &ScoreInputs, luck_ceiling: u64) -> u64 {
    base_score(inputs)
        .saturating_add(inputs.item_power)
        .saturating_add(variance(
            inputs.entropy,
            inputs.tactics.risk_pct(),
            luck_ceiling,
        ))
}

/// Picks the winner of two scored participants.
///
/// The strictly higher score wins. On a tie `tie_break` is drawn once: an
/// even value favours the lower agent id, an odd value the higher.
///
/// # Errors
///
/// Propagates a failing `tie_break` draw.
pub fn pick_winner(
    (a, score_a): (AgentId, u64),
    (b, score_b): (AgentId, u64),
    tie_break: impl FnOnce() -> Result<u64>,
) -> Result<AgentId> {
    if score_a != score_b {
        return Ok(if score_a > score_b { a } else { b });
    }
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    Ok(if tie_break()? % 2 == 0 { low } else { high })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::Strategy;
    use crate::error::ArenaError;
    use proptest::prelude::*;

    fn dna(strength: u32, agility: u32, intelligence: u32, affinity: u8) -> Dna {
        Dna {
            strength,
            agility,
            intelligence,
            elemental_affinity: affinity,
        }
    }

    fn inputs(tactics: Tactics) -> ScoreInputs {
        ScoreInputs {
            dna: dna(50, 40, 30, 0),
            health: 270,
            tactics,
            item_power: 0,
            opponent: dna(50, 40, 30, 2),
            arena: ArenaKind::Tundra,
            entropy: 0,
        }
    }

    mod elemental_tests {
        use super::*;

        #[test]
        fn direct_ignores_elements() {
            let own = dna(1, 1, 1, 0);
            let opp = dna(1, 1, 1, 1);
            assert_eq!(elemental_pct(Strategy::Direct, &own, &opp, ArenaKind::Volcano), 100);
        }

        #[test]
        fn counter_reads_the_matchup() {
            let fire = dna(1, 1, 1, 0);
            let water = dna(1, 1, 1, 1);
            let other = dna(1, 1, 1, 3);
            let arena = ArenaKind::Volcano;
            assert_eq!(elemental_pct(Strategy::Counter, &fire, &water, arena), 125);
            assert_eq!(elemental_pct(Strategy::Counter, &water, &fire, arena), 85);
            assert_eq!(elemental_pct(Strategy::Counter, &fire, &other, arena), 100);
        }

        #[test]
        fn terrain_reads_the_arena() {
            let own = dna(1, 1, 1, 3);
            let opp = dna(1, 1, 1, 0);
            assert_eq!(elemental_pct(Strategy::Terrain, &own, &opp, ArenaKind::Volcano), 125);
            assert_eq!(elemental_pct(Strategy::Terrain, &own, &opp, ArenaKind::Tundra), 95);
        }
    }

    mod score_tests {
        use super::*;

        #[test]
        fn base_score_for_neutral_tactics() {
            // offense 50*100/100, guard 40*100/100, core 270+50+40+30
            let score = base_score(&inputs(Tactics::new(50, Strategy::Direct, 0)));
            assert_eq!(score, 390);
        }

        #[test]
        fn aggression_trades_guard_for_offense() {
            let calm = base_score(&inputs(Tactics::new(0, Strategy::Direct, 0)));
            let wild = base_score(&inputs(Tactics::new(100, Strategy::Direct, 0)));
            // strength 50 > agility 40, so full aggression pays off here
            assert!(wild > calm);
        }

        #[test]
        fn item_power_is_added_in_full() {
            let mut with_item = inputs(Tactics::default());
            with_item.item_power = 1_000;
            let without = power_score(&inputs(Tactics::default()), 16);
            assert_eq!(power_score(&with_item, 16), without + 1_000);
        }

        #[test]
        fn huge_item_power_saturates() {
            let mut inputs = inputs(Tactics::default());
            inputs.item_power = u64::MAX;
            assert_eq!(power_score(&inputs, 16), u64::MAX);
        }

        #[test]
        fn zero_risk_keeps_only_luck() {
            assert_eq!(variance(0x1234_5678, 0, 16), 0x1234_5678 % 16);
        }
    }

    mod winner_tests {
        use super::*;

        #[test]
        fn higher_score_wins_without_drawing() {
            let a = AgentId::new(1);
            let b = AgentId::new(2);
            let winner = pick_winner((a, 10), (b, 9), || panic!("no tie-break on a clear win"));
            assert_eq!(winner.unwrap(), a);
            let winner = pick_winner((a, 9), (b, 10), || panic!("no tie-break on a clear win"));
            assert_eq!(winner.unwrap(), b);
        }

        #[test]
        fn even_tie_break_favours_lower_id() {
            let low = AgentId::new(3);
            let high = AgentId::new(8);
            assert_eq!(pick_winner((high, 5), (low, 5), || Ok(4)).unwrap(), low);
            assert_eq!(pick_winner((low, 5), (high, 5), || Ok(7)).unwrap(), high);
        }

        #[test]
        fn tie_break_failure_propagates() {
            let result = pick_winner((AgentId::new(1), 5), (AgentId::new(2), 5), || {
                Err(ArenaError::RandomnessUnavailable("offline".into()))
            });
            assert!(matches!(result, Err(ArenaError::RandomnessUnavailable(_))));
        }
    }

    proptest! {
        #[test]
        fn variance_is_bounded(entropy in any::<u64>(), risk in 0u64..=100, ceiling in 1u64..64) {
            prop_assert!(variance(entropy, risk, ceiling) < ceiling + SWING_RANGE);
        }

        #[test]
        fn score_never_below_scaled_health(
            entropy in any::<u64>(),
            aggressiveness in any::<u8>(),
            risk in any::<u8>(),
        ) {
            let mut inputs = inputs(Tactics::new(aggressiveness, Strategy::Counter, risk));
            inputs.entropy = entropy;
            prop_assert!(power_score(&inputs, 16) >= inputs.health * DISADVANTAGE_PCT / 100);
        }
    }
}
