//! Deterministic random number generator
//!
//! xorshift64: fast, tiny state, reproducible across platforms. Placement
//! rolls go through this so scheduler behavior can be replayed in tests from
//! a seed.

use serde::{Deserialize, Serialize};

/// A deterministic RNG for placement rolls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift requires non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Current state, for saving and restoring
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Next raw u64
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Random f64 in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64 + 1.0)
    }

    /// Random f64 in `[min, max)`
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}
