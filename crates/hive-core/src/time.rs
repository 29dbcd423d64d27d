//! Simulation time model.
//!
//! # Design
//!
//! Time is represented twice:
//!
//! - a monotonically increasing integer `Tick` counter, advanced once per
//!   *executed* (unpaused) tick; signal TTLs and output intervals are
//!   expressed in ticks so they stay exact;
//! - the simulated time `t` in seconds, advanced by `dt × speed` per tick.
//!   `speed` is a run-time multiplier, so `t` is not a pure function of the
//!   tick count.
//!
//! While paused neither counter moves.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// Executed-tick counter.  Signal lifetimes are measured against it.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and the accumulated simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick at `speed == 1.0`.
    pub dt: f32,
    /// Advanced by [`SimClock::advance`].
    pub current_tick: Tick,
    /// Simulated seconds elapsed since tick 0.
    pub elapsed: f64,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self { dt, current_tick: Tick::ZERO, elapsed: 0.0 }
    }

    /// The step length for one tick at the given speed multiplier.
    #[inline]
    pub fn scaled_dt(&self, speed: f32) -> f32 {
        self.dt * speed
    }

    /// Advance by one tick that covered `step` simulated seconds.
    #[inline]
    pub fn advance(&mut self, step: f32) {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.elapsed += f64::from(step);
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (t={:.2}s)", self.current_tick, self.elapsed)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from JSON by `hive_sim::SimSettings`; every field has a
/// default matching the reference colony.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// World width in world units.
    pub width: f32,

    /// World height in world units.
    pub height: f32,

    /// Simulated seconds per tick at speed 1.0.
    pub dt: f32,

    /// Real-time tick rate used by the async driver.
    pub tick_hz: u32,

    /// Master RNG seed.  The same seed and command sequence always produce
    /// identical runs.
    pub seed: u64,

    /// Call `SimObserver::on_view` every N executed ticks.  0 disables it.
    pub output_interval_ticks: u64,

    /// Bound of the external command queue.
    pub command_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width:                 960.0,
            height:                540.0,
            dt:                    1.0 / 60.0,
            tick_hz:               60,
            seed:                  0,
            output_interval_ticks: 0,
            command_capacity:      1024,
        }
    }
}

impl SimConfig {
    /// Reject configurations the scheduler cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(CoreError::Config(format!(
                "world size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(CoreError::Config(format!("dt must be positive, got {}", self.dt)));
        }
        if self.tick_hz == 0 {
            return Err(CoreError::Config("tick_hz must be at least 1".into()));
        }
        if self.command_capacity == 0 {
            return Err(CoreError::Config("command_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.dt)
    }
}
