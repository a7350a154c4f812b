//! Injectable random source
//!
//! Flap strength, flap timing and horizontal speed re-rolls all draw from a
//! `RandomSource` handed in by the caller, so a seeded world replays exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Uniform integer source
pub trait RandomSource {
    /// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
    fn range(&mut self, min: i32, max: i32) -> i32;
}

impl RandomSource for Pcg32 {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.random_range(min..max)
    }
}

/// Half-open integer range `[min, max)` drawn uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    pub fn draw<R: RandomSource + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.range(self.min, self.max)
    }
}

impl From<(i32, i32)> for IntRange {
    fn from((min, max): (i32, i32)) -> Self {
        Self::new(min, max)
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Replays a fixed list of draws, clamped into the requested range.
/// Once exhausted every draw returns `min`.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedRng {
    values: std::collections::VecDeque<i32>,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: &[i32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        match self.values.pop_front() {
            Some(v) => v.clamp(min, max - 1),
            None => min,
        }
    }
}
