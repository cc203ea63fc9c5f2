//! Seedable random source for obstacle generation
//!
//! Layout math only ever sees [`RandomSource`], so tests can inject a
//! scripted sequence and assert exact layouts.

use std::collections::VecDeque;
use std::fmt::Debug;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform random draws in `[0, 1)`
pub trait RandomSource: Debug {
    /// Next uniform value in `[0, 1)`
    fn unit(&mut self) -> f32;

    /// Uniform value in `[lo, hi)`
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform value in `[-1, 1)`
    fn signed_unit(&mut self) -> f32 {
        self.unit() * 2.0 - 1.0
    }

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// -1.0 or +1.0 with equal odds
    fn sign(&mut self) -> f32 {
        if self.unit() < 0.5 { -1.0 } else { 1.0 }
    }

    /// Uniform index in `0..len` (`len` must be non-zero)
    fn index(&mut self, len: usize) -> usize {
        ((self.unit() * len as f32) as usize).min(len.saturating_sub(1))
    }
}

impl RandomSource for Pcg32 {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Production source: PCG32 seeded per run
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of draws, then repeats `fallback`
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: VecDeque<f32>,
    fallback: f32,
}

impl SequenceRng {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Value returned once the scripted draws run out
    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws left in the script
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for SequenceRng {
    fn unit(&mut self) -> f32 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}
