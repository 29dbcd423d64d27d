//! Seeded random sources.
//!
//! A run draws from two kinds of stream:
//!
//! - one [`AgentRng`] per bee, for turn noise and role-switch draws, and
//! - one [`SimRng`] owned by the scheduler, for where new bees and flowers
//!   appear.
//!
//! A bee's stream depends only on the run seed and its `AgentId`, so bees
//! added mid-run leave every existing stream untouched.  The run is then a
//! pure function of the seed and the command sequence.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, Vec2};

/// SplitMix64 finaliser over `seed + id`.
fn agent_seed(seed: u64, agent: AgentId) -> u64 {
    let mut z = seed.wrapping_add(u64::from(agent.0).wrapping_add(1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// One bee's private stream.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(seed: u64, agent: AgentId) -> Self {
        AgentRng(SmallRng::seed_from_u64(agent_seed(seed, agent)))
    }

    #[inline]
    pub fn uniform<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`.  Out-of-range `p` saturates.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.0.gen_bool(f64::from(p.clamp(0.0, 1.0)))
    }

    /// Noise in `[-amplitude / 2, amplitude / 2)`.
    #[inline]
    pub fn jitter(&mut self, amplitude: f32) -> f32 {
        self.0.gen_range(-0.5f32..0.5) * amplitude
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// The scheduler's placement stream.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn uniform<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Uniform in `range`, or its start if the range is empty.
    pub fn within(&mut self, range: RangeInclusive<f32>) -> f32 {
        let (lo, hi) = range.into_inner();
        if hi > lo { self.0.gen_range(lo..=hi) } else { lo }
    }

    /// Uniform angle in `[0, τ)`.
    #[inline]
    pub fn angle(&mut self) -> f32 {
        self.0.gen_range(0.0..TAU)
    }

    /// Uniform point inside the disc of `radius` around `center`.
    pub fn point_in_disc(&mut self, center: Vec2, radius: f32) -> Vec2 {
        if radius <= 0.0 {
            return center;
        }
        let r = radius * self.0.r#gen::<f32>().sqrt();
        center + Vec2::from_angle(self.angle()) * r
    }
}
