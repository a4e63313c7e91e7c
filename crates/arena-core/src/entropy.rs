//! Randomness capability consumed by the registry and the battle engine.
//!
//! The core treats entropy as opaque: a [`RandomnessSource`] hands out one
//! `u64` per draw and nothing is assumed about its distribution beyond modulo
//! reduction into the needed range. Sources are shared as
//! `Arc<dyn RandomnessSource>` so the registry and the engine can be wired to
//! the same oracle, and so tests can substitute a fixed value.
//!
//! When one draw has to feed several independent rolls (the four DNA
//! attributes, the three level-up gains) it is expanded into a ChaCha stream
//! with [`expand`]. A fixed source therefore still yields distinct stats,
//! and changing the drawn value changes every derived roll.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{ArenaError, Result};

/// A source of opaque entropy.
///
/// Implementations must be usable behind a shared reference; any internal
/// state lives behind interior mutability. A draw that cannot be served
/// returns [`ArenaError::RandomnessUnavailable`] and the calling operation
/// is rejected without side effects.
pub trait RandomnessSource: Send + Sync {
    /// Returns one entropy value.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::RandomnessUnavailable`] if the source cannot
    /// produce a value.
    fn draw(&self) -> Result<u64>;
}

/// Expands one entropy value into an independent sub-draw stream.
#[must_use]
pub fn expand(entropy: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(entropy)
}

/// Always returns the same configurable value.
///
/// Mirrors a mocked oracle: tests pin the value, change it between calls
/// with [`FixedEntropy::set`], and replay exact outcomes.
#[derive(Debug, Default)]
pub struct FixedEntropy {
    value: AtomicU64,
}

impl FixedEntropy {
    /// Creates a source that returns `value` on every draw.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }

    /// Replaces the value returned by subsequent draws.
    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::SeqCst);
    }

    /// Returns the current value without drawing.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

impl RandomnessSource for FixedEntropy {
    fn draw(&self) -> Result<u64> {
        Ok(self.value())
    }
}

/// Deterministic pseudo-random stream seeded from a `u64`.
///
/// Two sources built from the same seed produce identical sequences, which
/// makes whole tournaments replayable.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<ChaCha8Rng>,
    seed: u64,
}

impl SeededEntropy {
    /// Creates a stream from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            seed,
        }
    }

    /// Returns the seed this stream was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomnessSource for SeededEntropy {
    fn draw(&self) -> Result<u64> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ArenaError::RandomnessUnavailable("seeded stream poisoned".into()))?;
        Ok(rng.next_u64())
    }
}

/// Cycles through a scripted list of values.
///
/// Useful when a test needs to steer individual draws, e.g. forcing a tie
/// and then choosing the tie-break parity.
#[derive(Debug)]
pub struct SequenceEntropy {
    values: Vec<u64>,
    cursor: Mutex<usize>,
}

impl SequenceEntropy {
    /// Creates a source that yields `values` in order, wrapping around.
    ///
    /// An empty list yields a source whose every draw fails.
    #[must_use]
    pub fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            cursor: Mutex::new(0),
        }
    }

    /// Number of draws served so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor.lock().map(|c| *c).unwrap_or_default()
    }
}

impl RandomnessSource for SequenceEntropy {
    fn draw(&self) -> Result<u64> {
        if self.values.is_empty() {
            return Err(ArenaError::RandomnessUnavailable(
                "sequence has no values".into(),
            ));
        }
        let mut cursor = self
            .cursor
            .lock()
            .map_err(|_| ArenaError::RandomnessUnavailable("sequence poisoned".into()))?;
        let value = self.values[*cursor % self.values.len()];
        *cursor += 1;
        Ok(value)
    }
}
