//! The immutable per-tick snapshot published to external readers.
//!
//! Positions, headings and nectar amounts are rounded to two decimals when
//! the View is composed, so a serialized View deserializes to an equal one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hive_agent::Agent;
use hive_core::{BeeKind, Role, Vec2};
use hive_signal::{BusStats, SignalKind};
use hive_world::{Flower, Hive, Weather, WeatherMode, World};

/// Round to the View's declared precision.
#[inline]
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Simulated seconds.
    pub t:      f64,
    /// Executed ticks.
    pub tick:   u64,
    pub paused: bool,
    pub speed:  f32,
    pub width:  f32,
    pub height: f32,
    pub bees:   Vec<BeeView>,
    pub world:  WorldView,
    pub stats:  StatsView,
}

/// Public projection of an [`Agent`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BeeView {
    pub id:         u32,
    pub x:          f32,
    pub y:          f32,
    pub heading:    f32,
    pub kind:       BeeKind,
    pub role:       Role,
    pub state:      String,
    pub carrying:   f32,
    pub flash:      f32,
    pub flash_kind: Option<SignalKind>,
}

impl BeeView {
    pub fn of(agent: &Agent) -> Self {
        Self {
            id:         agent.id.0,
            x:          round2(agent.pos.x),
            y:          round2(agent.pos.y),
            heading:    round2(agent.heading),
            kind:       agent.kind,
            role:       agent.role,
            state:      agent.state.name().to_owned(),
            carrying:   round2(agent.carrying),
            flash:      round2(agent.flash),
            flash_kind: agent.flash_kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HiveView {
    pub x:        f32,
    pub y:        f32,
    pub r:        f32,
    pub entrance: [f32; 2],
}

impl HiveView {
    pub fn of(hive: &Hive) -> Self {
        let round = |v: Vec2| [round2(v.x), round2(v.y)];
        let [x, y] = round(hive.center);
        Self { x, y, r: round2(hive.radius), entrance: round(hive.entrance) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowerView {
    pub id:        u32,
    pub x:         f32,
    pub y:         f32,
    pub capacity:  f32,
    pub remaining: f32,
    /// `remaining / capacity`.
    pub frac:      f32,
    pub visited:   bool,
}

impl FlowerView {
    pub fn of(flower: &Flower) -> Self {
        Self {
            id:        flower.id.0,
            x:         round2(flower.pos.x),
            y:         round2(flower.pos.y),
            capacity:  round2(flower.capacity),
            remaining: round2(flower.remaining),
            frac:      round2(flower.fraction()),
            visited:   flower.visited,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    pub hive:              HiveView,
    pub flowers:           Vec<FlowerView>,
    pub flowers_remaining: usize,
    pub total_deposited:   f32,
    pub receiver_queue:    f32,
    pub weather:           WeatherView,
}

impl WorldView {
    pub fn of(world: &World) -> Self {
        Self {
            hive:              HiveView::of(&world.hive),
            flowers:           world.flowers().iter().map(FlowerView::of).collect(),
            flowers_remaining: world.flowers_remaining(),
            total_deposited:   round2(world.total_deposited()),
            receiver_queue:    round2(world.hive.receiver_queue),
            weather:           WeatherView::of(&world.weather),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherView {
    /// Time of day in `[0, 1)`; midday is `0.5`.
    pub tod:  f32,
    pub flow: f32,
    pub rain: bool,
    /// Whether foragers may leave the hive.
    pub open: bool,
    pub mode: WeatherMode,
}

impl WeatherView {
    pub fn of(weather: &Weather) -> Self {
        Self {
            tod:  round2(weather.tod()),
            flow: round2(weather.nectar_flow()),
            rain: weather.is_raining(),
            open: weather.foraging_open(),
            mode: weather.mode(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    /// Bees per role; every role is present, possibly with 0.
    pub roles:            BTreeMap<Role, usize>,
    /// Queued signals per kind.
    pub signals:          BTreeMap<SignalKind, usize>,
    /// Cumulative evictions plus inbox drops per kind.
    pub dropped:          BTreeMap<SignalKind, u64>,
    pub receiver_queue:   f32,
    pub queue_avg:        f32,
    /// Bees currently in the recruiting state.
    pub waggle_active:    usize,
    /// Bees that perceived at least one signal on the last executed tick.
    pub receivers_active: usize,
}

impl StatsView {
    pub fn compose(agents: &[Agent], world: &World, bus: &BusStats, receivers_active: usize) -> Self {
        let mut roles: BTreeMap<Role, usize> = Role::ALL.into_iter().map(|r| (r, 0)).collect();
        for agent in agents {
            *roles.entry(agent.role).or_default() += 1;
        }
        Self {
            roles,
            signals: bus.occupancy.clone(),
            dropped: bus.dropped(),
            receiver_queue: round2(world.hive.receiver_queue),
            queue_avg: round2(bus.queue_avg),
            waggle_active: agents.iter().filter(|a| a.state.is_recruiting()).count(),
            receivers_active,
        }
    }
}
