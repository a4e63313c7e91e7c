//! Experience thresholds and attribute rolls.
//!
//! All rolls take an already-drawn entropy value and expand it with
//! [`entropy::expand`](crate::entropy::expand), so they are pure functions
//! of their input and trivially replayable.

use rand::RngCore;

use super::{Dna, AFFINITY_COUNT};
use crate::entropy::expand;

/// Lowest value a freshly rolled stat can take.
pub const STAT_BASE: u32 = 25;
/// Number of distinct values a freshly rolled stat can take (`25..=74`).
pub const STAT_SPAN: u64 = 50;
/// Smallest per-stat gain on level-up.
pub const GAIN_BASE: u32 = 2;
/// Number of distinct per-stat gains on level-up (`2..=4`).
pub const GAIN_SPAN: u64 = 3;

/// Cumulative experience needed to advance past `level`.
///
/// `level^3 * 100`, saturating far beyond any reachable level.
///
/// ```
/// use arena_core::agent::xp_to_level_up;
///
/// assert_eq!(xp_to_level_up(1), 100);
/// assert_eq!(xp_to_level_up(2), 800);
/// assert_eq!(xp_to_level_up(3), 2700);
/// ```
#[must_use]
pub const fn xp_to_level_up(level: u32) -> u64 {
    (level as u64).saturating_pow(3).saturating_mul(100)
}

/// Rolls the attribute tuple of a new agent.
#[must_use]
pub fn roll_dna(entropy: u64) -> Dna {
    let mut stream = expand(entropy);
    // Reduced value is < 50, the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation)]
    let mut stat = || STAT_BASE + (stream.next_u64() % STAT_SPAN) as u32;
    let strength = stat();
    let agility = stat();
    let intelligence = stat();
    #[allow(clippy::cast_possible_truncation)]
    let elemental_affinity = (stream.next_u64() % u64::from(AFFINITY_COUNT)) as u8;
    Dna {
        strength,
        agility,
        intelligence,
        elemental_affinity,
    }
}

/// Per-stat increases applied by one level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelGains {
    /// Added to strength.
    pub strength: u32,
    /// Added to agility.
    pub agility: u32,
    /// Added to intelligence.
    pub intelligence: u32,
}

impl LevelGains {
    /// Rolls three independent gains in `[2, 4]`.
    #[must_use]
    pub fn roll(entropy: u64) -> Self {
        let mut stream = expand(entropy);
        #[allow(clippy::cast_possible_truncation)]
        let mut gain = || GAIN_BASE + (stream.next_u64() % GAIN_SPAN) as u32;
        Self {
            strength: gain(),
            agility: gain(),
            intelligence: gain(),
        }
    }
}
