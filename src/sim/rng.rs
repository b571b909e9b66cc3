//! Random number service
//!
//! Every probabilistic decision in the simulation draws from a
//! [`RandomSource`]. The session is generic over it so tests can swap the
//! seeded PCG stream for a scripted sequence.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    /// Next uniform draw in [0, 1)
    fn draw_uniform(&mut self) -> f32;

    /// Uniform float in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.draw_uniform()
    }

    /// Uniform integer in [lo, hi]
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        // Widened so a full u32 span cannot overflow
        let span = u64::from(hi - lo) + 1;
        let offset = (f64::from(self.draw_uniform()) * span as f64) as u64;
        lo + offset.min(u64::from(hi - lo)) as u32
    }

    /// True with probability `p` (`draw < p`)
    fn chance(&mut self, p: f32) -> bool {
        self.draw_uniform() < p
    }

    /// Index into `weights` chosen proportionally to its weight.
    /// Returns `None` when every weight is zero.
    fn weighted_index(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.draw_uniform() * total;
        let mut last = None;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(i);
            }
            roll -= w;
            last = Some(i);
        }
        // Float rounding can leave a sliver past the last bucket
        last
    }
}

/// Seeded PCG stream used in real sessions
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    rng: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SimRng {
    fn draw_uniform(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(draws: impl Into<Vec<f32>>) -> Self {
        let mut draws = draws.into();
        if draws.is_empty() {
            draws.push(0.0);
        }
        for d in &mut draws {
            // Keep the [0, 1) contract even for hand-written scripts
            *d = d.clamp(0.0, 0.999_999);
        }
        Self { draws, cursor: 0 }
    }

    /// Source that always returns the same draw
    pub fn constant(draw: f32) -> Self {
        Self::new(vec![draw])
    }
}

impl RandomSource for ScriptedRng {
    fn draw_uniform(&mut self) -> f32 {
        let d = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        d
    }
}
