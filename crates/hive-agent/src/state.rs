//! Role-specific behavior states.

use hive_core::{FlowerId, Role, Vec2};

use crate::ColonyParams;

/// A flower a forager is working, with its position cached so recruitment
/// signals can be built without a world lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowerTarget {
    pub flower: FlowerId,
    pub pos:    Vec2,
}

/// The finite state of one bee.  Which variants are reachable depends on the
/// bee's role; see [`crate::machine`].
///
/// Timer fields count simulated seconds down to zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BehaviorState {
    // ── Forager ───────────────────────────────────────────────────────────
    Searching,
    TravelingToFlower { target: FlowerTarget },
    /// `quality` is the flower's remaining fraction when foraging began.
    Foraging { target: FlowerTarget, quality: f32 },
    Returning { target: FlowerTarget, quality: f32 },
    Unloading { target: FlowerTarget, quality: f32 },
    Recruiting { target: FlowerTarget, quality: f32, remaining: f32, next_circuit: f32 },

    // ── Receiver ──────────────────────────────────────────────────────────
    /// `idle` counts up while the queue is empty.
    Waiting { idle: f32 },
    Receiving,

    // ── Nurse ─────────────────────────────────────────────────────────────
    Tending { remaining: f32 },
    Resting { remaining: f32 },

    // ── Fanner ────────────────────────────────────────────────────────────
    Idle,
    Fanning { remaining: f32 },

    // ── Queen / drone ─────────────────────────────────────────────────────
    Laying { until_signal: f32 },
    Wandering,
}

impl BehaviorState {
    /// The state a bee enters when it takes on `role`.
    pub fn initial(role: Role, params: &ColonyParams) -> Self {
        match role {
            Role::Forager => BehaviorState::Searching,
            Role::Receiver => BehaviorState::Waiting { idle: 0.0 },
            Role::Nurse => BehaviorState::Tending { remaining: params.nurse_tend_secs },
            Role::Fanner => BehaviorState::Idle,
            Role::Queen => BehaviorState::Laying { until_signal: 0.0 },
            Role::Drone => BehaviorState::Wandering,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BehaviorState::Searching => "searching",
            BehaviorState::TravelingToFlower { .. } => "traveling_to_flower",
            BehaviorState::Foraging { .. } => "foraging",
            BehaviorState::Returning { .. } => "returning",
            BehaviorState::Unloading { .. } => "unloading",
            BehaviorState::Recruiting { .. } => "recruiting",
            BehaviorState::Waiting { .. } => "waiting",
            BehaviorState::Receiving => "receiving",
            BehaviorState::Tending { .. } => "tending",
            BehaviorState::Resting { .. } => "resting",
            BehaviorState::Idle => "idle",
            BehaviorState::Fanning { .. } => "fanning",
            BehaviorState::Laying { .. } => "laying",
            BehaviorState::Wandering => "wandering",
        }
    }

    #[inline]
    pub fn is_recruiting(&self) -> bool {
        matches!(self, BehaviorState::Recruiting { .. })
    }

    /// The flower this state is working, if any.
    pub fn target(&self) -> Option<FlowerTarget> {
        match *self {
            BehaviorState::TravelingToFlower { target }
            | BehaviorState::Foraging { target, .. }
            | BehaviorState::Returning { target, .. }
            | BehaviorState::Unloading { target, .. }
            | BehaviorState::Recruiting { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl std::fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
