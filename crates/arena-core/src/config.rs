//! Tunables for battle resolution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Experience credited to the winner of a battle.
pub const DEFAULT_VICTORY_REWARD: u64 = 50;
/// Exclusive upper bound of the flat luck term added to every score.
pub const DEFAULT_LUCK_CEILING: u64 = 16;

/// Configuration for a [`BattleEngine`](crate::battle::BattleEngine).
///
/// ```
/// use arena_core::config::ArenaConfig;
///
/// let config = ArenaConfig::default().with_victory_reward(75);
/// assert_eq!(config.victory_reward, 75);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Experience credited to each battle winner.
    pub victory_reward: u64,
    /// Luck term is drawn from `[0, luck_ceiling)`.
    pub luck_ceiling: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            victory_reward: DEFAULT_VICTORY_REWARD,
            luck_ceiling: DEFAULT_LUCK_CEILING,
        }
    }
}

impl ArenaConfig {
    /// Replaces the victory reward.
    #[must_use]
    pub fn with_victory_reward(mut self, reward: u64) -> Self {
        self.victory_reward = reward;
        self
    }

    /// Replaces the luck ceiling.
    #[must_use]
    pub fn with_luck_ceiling(mut self, ceiling: u64) -> Self {
        self.luck_ceiling = ceiling;
        self
    }

    /// Checks the configuration for values the engine cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLuckCeiling`] when `luck_ceiling` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.luck_ceiling == 0 {
            return Err(ConfigError::ZeroLuckCeiling);
        }
        Ok(())
    }
}

/// Invalid [`ArenaConfig`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The luck term needs a non-empty range.
    #[error("luck_ceiling must be at least 1")]
    ZeroLuckCeiling,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = ArenaConfig::default();
        assert_eq!(config.victory_reward, 50);
        assert_eq!(config.luck_ceiling, 16);
    }

    #[test]
    fn zero_luck_ceiling_is_rejected() {
        let config = ArenaConfig::default().with_luck_ceiling(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroLuckCeiling));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ArenaConfig = serde_json::from_str(r#"{"victory_reward": 10}"#).unwrap();
        assert_eq!(config.victory_reward, 10);
        assert_eq!(config.luck_ceiling, DEFAULT_LUCK_CEILING);
    }
}
