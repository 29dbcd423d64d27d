//! Perception events and the actions transitions produce.

use hive_core::Role;
use hive_signal::{SignalKind, SignalPayload};

use crate::{BehaviorState, FlowerTarget};

/// What an agent perceived this tick.  Exactly one per agent per tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Nothing relevant happened.
    Idle,
    /// A searching forager picked a flower.  `recruited` is `true` when the
    /// flower came from a waggle rather than direct sensing.
    FlowerFound { target: FlowerTarget, quality: f32, recruited: bool },
    /// The target flower ran dry before the forager got any nectar from it.
    FlowerLost,
    ArrivedAtFlower { quality: f32 },
    /// Full load, or the flower emptied mid-visit.
    ForagingDone,
    ArrivedAtHive,
    /// The load was handed to the receiver queue.  `backlog` is the queue
    /// length the forager saw.
    Unloaded { quality: f32, backlog: f32 },
    /// Time for another waggle circuit.
    DanceCircuit,
    DanceFinished { flower_alive: bool },
    TimerElapsed,
    /// A tremble was felt and the bee decided to answer it.
    TrembleFelt,
    SignalReceived(SignalKind),
    QueueNonEmpty,
    QueueEmpty,
}

/// A signal an agent wants to emit.  The agent fills in origin, radius,
/// ttl, and tick when applying it.
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub kind:    SignalKind,
    pub payload: SignalPayload,
}

impl Emission {
    pub fn new(kind: SignalKind, payload: SignalPayload) -> Self {
        Self { kind, payload }
    }

    pub fn plain(kind: SignalKind) -> Self {
        Self { kind, payload: SignalPayload::None }
    }

    /// Flower advertisement used by waggle and nasonov.
    pub fn flower(kind: SignalKind, target: FlowerTarget, quality: f32) -> Self {
        Self {
            kind,
            payload: SignalPayload::Flower { flower: target.flower, pos: target.pos, quality },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    None,
    Emit(Emission),
    SwitchRole(Role),
}

/// Result of a successful table lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub next:   BehaviorState,
    pub action: Action,
}

impl Transition {
    pub fn to(next: BehaviorState) -> Self {
        Self { next, action: Action::None }
    }

    pub fn emit(next: BehaviorState, emission: Emission) -> Self {
        Self { next, action: Action::Emit(emission) }
    }
}
