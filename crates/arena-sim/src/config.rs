//! Tournament configuration.
//!
//! Loaded from an optional JSON file. Missing fields take their defaults, so
//! `{}` is a valid config.

use std::fs;
use std::path::{Path, PathBuf};

use arena_core::{ArenaConfig, ItemCatalog, ItemId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Args;

/// Default seed when neither file nor flag sets one.
pub const DEFAULT_SEED: u64 = 42;
/// Default number of minted agents.
pub const DEFAULT_AGENTS: u64 = 8;
/// Default number of rounds.
pub const DEFAULT_ROUNDS: u32 = 5;

/// Errors raised while loading or checking a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid config JSON.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The arena settings are unusable.
    #[error(transparent)]
    Arena(#[from] arena_core::config::ConfigError),

    /// A battle needs two agents.
    #[error("a tournament needs at least 2 agents, got {0}")]
    TooFewAgents(u64),
}

/// One entry of the item catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Item id; 0 is ignored.
    pub id: u64,
    /// Power added to the holder's score.
    pub power: u64,
}

/// Full tournament configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Battle tuning.
    pub arena: ArenaConfig,
    /// Seed for the randomness source.
    pub seed: u64,
    /// Number of agents to mint.
    pub agents: u64,
    /// Number of rounds to play.
    pub rounds: u32,
    /// Items handed out round-robin after minting.
    pub items: Vec<ItemEntry>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            seed: DEFAULT_SEED,
            agents: DEFAULT_AGENTS,
            rounds: DEFAULT_ROUNDS,
            items: vec![
                ItemEntry { id: 1, power: 10 },
                ItemEntry { id: 2, power: 25 },
                ItemEntry { id: 3, power: 40 },
            ],
        }
    }
}

impl SimConfig {
    /// Parses a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid config JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Applies command line overrides.
    #[must_use]
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(agents) = args.agents {
            self.agents = agents;
        }
        if let Some(rounds) = args.rounds {
            self.rounds = rounds;
        }
        self
    }

    /// Checks the config can run a tournament.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Arena`] for unusable arena settings and
    /// [`ConfigError::TooFewAgents`] below two agents.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;
        if self.agents < 2 {
            return Err(ConfigError::TooFewAgents(self.agents));
        }
        Ok(())
    }

    /// Builds the item catalog.
    #[must_use]
    pub fn catalog(&self) -> ItemCatalog {
        let mut catalog = ItemCatalog::new();
        for item in &self.items {
            catalog.insert(ItemId::new(item.id), item.power);
        }
        catalog
    }
}
