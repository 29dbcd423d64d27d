//! Fluent builder for constructing a seeded [`Simulation`].

use hive_core::{BeeKind, Role, Vec2};

use crate::{SimError, SimResult, SimSettings, Simulation};
use crate::command::{MAX_SPEED, ParamKey};

/// Flowers per patch in [`SimBuilder::default_colony`].
pub const DEFAULT_PATCH_SIZE: usize = 12;

enum Seed {
    Bees { count: usize, kind: BeeKind, role: Option<Role> },
    Patch { count: usize },
    FlowersAt { at: Vec2, n: usize, capacity: Option<f32> },
}

/// Fluent builder for [`Simulation`].
///
/// Seeding steps run in the order they were added, all drawing from the
/// run's seeded RNG, so the same builder chain always yields the same colony.
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                    |
/// |----------------------|----------------------------|
/// | `.bees(..)`          | no bees                    |
/// | `.flower_patch(n)`   | no flowers                 |
/// | `.flowers_at(..)`    | no flowers                 |
/// | `.paused(b)`         | `false`                    |
/// | `.speed(v)`          | `1.0`                      |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimSettings::default())
///     .default_colony()
///     .build()?;
/// sim.run_ticks(600, &mut NoopObserver);
/// ```
pub struct SimBuilder {
    settings: SimSettings,
    seeds:    Vec<Seed>,
    params:   Vec<(ParamKey, f32)>,
    paused:   bool,
    speed:    f32,
}

impl SimBuilder {
    pub fn new(settings: SimSettings) -> Self {
        Self { settings, seeds: Vec::new(), params: Vec::new(), paused: false, speed: 1.0 }
    }

    /// Add `count` bees of `kind`.  `role = None` uses the kind's default.
    pub fn bees(mut self, count: usize, kind: BeeKind, role: Option<Role>) -> Self {
        self.seeds.push(Seed::Bees { count, kind, role });
        self
    }

    /// Add one random patch of `count` flowers.
    pub fn flower_patch(mut self, count: usize) -> Self {
        self.seeds.push(Seed::Patch { count });
        self
    }

    /// Add `n` flowers clustered around `at`; the first sits exactly at `at`.
    pub fn flowers_at(mut self, at: Vec2, n: usize, capacity: Option<f32>) -> Self {
        self.seeds.push(Seed::FlowersAt { at, n, capacity });
        self
    }

    /// The reference colony: one queen, twelve foragers, three receivers,
    /// two nurses, two fanners and three flower patches.
    pub fn default_colony(self) -> Self {
        self.flower_patch(DEFAULT_PATCH_SIZE)
            .flower_patch(DEFAULT_PATCH_SIZE)
            .flower_patch(DEFAULT_PATCH_SIZE)
            .bees(1, BeeKind::Queen, None)
            .bees(12, BeeKind::Worker, Some(Role::Forager))
            .bees(3, BeeKind::Worker, Some(Role::Receiver))
            .bees(2, BeeKind::Worker, Some(Role::Nurse))
            .bees(2, BeeKind::Worker, Some(Role::Fanner))
    }

    /// Override one agent tunable for the whole colony.
    pub fn param(mut self, key: ParamKey, value: f32) -> Self {
        self.params.push((key, value));
        self
    }

    /// Start paused.
    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Validate settings, run every seeding step and return a ready-to-run
    /// [`Simulation`].
    pub fn build(self) -> SimResult<Simulation> {
        if !(self.speed.is_finite() && (0.0..=MAX_SPEED).contains(&self.speed)) {
            return Err(SimError::Config(format!("speed must be in [0, {MAX_SPEED}], got {}", self.speed)));
        }

        let mut sim = Simulation::new(self.settings)?;
        for (key, value) in self.params {
            sim.set_param(key, value).map_err(|e| SimError::Config(e.to_string()))?;
        }
        for seed in self.seeds {
            match seed {
                Seed::Bees { count, kind, role } => {
                    sim.spawn_bees(count, kind, role)?;
                }
                Seed::Patch { count } => {
                    sim.add_flowers(count);
                }
                Seed::FlowersAt { at, n, capacity } => {
                    sim.add_flower_at(at, n, capacity)?;
                }
            }
        }
        sim.set_run_state(self.paused, self.speed);
        Ok(sim)
    }
}
