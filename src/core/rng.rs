//! Seeded randomness for deck order and reaction rolls.
//!
//! A skirmish draws randomness for two unrelated things: shuffling the
//! deck and rolling Protection Gem / AI Defend chances. Each gets its own
//! stream derived from the root seed, so an extra reshuffle never changes
//! whether a later gem roll succeeds.
//!
//! ```
//! use dino_tactics::core::GameRng;
//!
//! let root = GameRng::new(42);
//! let mut deck = root.for_context("shuffle");
//! let mut reaction = root.for_context("reaction");
//!
//! let roll = reaction.gen_unit();
//! assert!((0.0..1.0).contains(&roll));
//!
//! let mut cards = vec!["Attack", "Defend", "Charge"];
//! deck.shuffle(&mut cards);
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// ChaCha8 stream with a known seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Fresh stream for `context`, derived from this stream's seed only.
    ///
    /// Derivation uses `FxHasher`, which is stable across runs and builds.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform sample in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform permutation in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }
}
