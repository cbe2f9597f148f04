//! Entropy providers for decoy generation.
//!
//! Nothing in the codec calls an ambient RNG. Every operation that needs
//! randomness takes an [`EntropySource`] parameter, so production code can
//! inject an OS-seeded provider while tests inject a seeded one and get
//! reproducible tokens and matrices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for headers, obfuscation offsets and decoys.
///
/// Implementations must draw uniformly; biased draws would make meaningful
/// payload slots statistically distinguishable from decoys.
pub trait EntropySource {
    /// Uniform draw in `0..bound`. `bound` must be non-zero.
    fn below(&mut self, bound: u32) -> u32;

    /// Uniform decimal digit.
    fn digit(&mut self) -> u8 {
        self.below(10) as u8
    }

    /// Sample `count` distinct values from `0..bound` in draw order
    /// (partial Fisher-Yates). `count` must not exceed `bound`.
    fn sample_distinct(&mut self, bound: u32, count: usize) -> Vec<u8> {
        debug_assert!(count <= bound as usize);
        let mut pool: Vec<u8> = (0..bound as u8).collect();
        for i in 0..count {
            let j = i + self.below((bound as usize - i) as u32) as usize;
            pool.swap(i, j);
        }
        pool.truncate(count);
        pool
    }
}

/// OS-seeded provider for production use.
pub struct OsEntropy {
    rng: StdRng,
}

impl OsEntropy {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for OsEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for OsEntropy {
    fn below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

/// Deterministic provider for testing.
/// WARNING: Do not use in production - same seed, same token!
pub struct SeededEntropy {
    rng: StdRng,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl EntropySource for SeededEntropy {
    fn below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}
