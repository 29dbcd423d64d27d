//! The `Signal` record.

use hive_core::{AgentId, FlowerId, Tick, Vec2};

use crate::{Scope, SignalKind};

/// Kind-specific content of a signal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum SignalPayload {
    None,
    /// Carried by `waggle` and `nasonov`.
    Flower { flower: FlowerId, pos: Vec2, quality: f32 },
    /// Carried by `tremble`: receiver-queue backlog at emission time.
    Congestion { backlog: f32 },
}

/// One emitted signal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub kind:       SignalKind,
    pub emitter:    AgentId,
    pub origin:     Vec2,
    /// Perception radius for `Scope::Local` kinds.  Ignored for colony-wide
    /// kinds.
    pub radius:     f32,
    pub payload:    SignalPayload,
    pub emitted_at: Tick,
    /// Lifetime in ticks; the signal is purged once `emitted_at + ttl ≤ now`.
    pub ttl:        u32,
    /// Bus-assigned emission order.  Zero until emitted.
    pub seq:        u64,
}

impl Signal {
    pub fn new(
        kind: SignalKind,
        emitter: AgentId,
        origin: Vec2,
        radius: f32,
        payload: SignalPayload,
        emitted_at: Tick,
        ttl: u32,
    ) -> Self {
        Self { kind, emitter, origin, radius, payload, emitted_at, ttl, seq: 0 }
    }

    #[inline]
    pub fn expires_at(&self) -> Tick {
        self.emitted_at + u64::from(self.ttl)
    }

    #[inline]
    pub fn is_expired(&self, now: Tick) -> bool {
        self.expires_at() <= now
    }

    /// `true` if a bee standing at `pos` perceives this signal.
    #[inline]
    pub fn reaches(&self, pos: Vec2) -> bool {
        match self.kind.scope() {
            Scope::Colony => true,
            Scope::Local => pos.distance_sq(self.origin) <= self.radius * self.radius,
        }
    }

    /// The advertised flower, for waggle and nasonov payloads.
    pub fn flower(&self) -> Option<(FlowerId, Vec2, f32)> {
        match self.payload {
            SignalPayload::Flower { flower, pos, quality } => Some((flower, pos, quality)),
            _ => None,
        }
    }
}
