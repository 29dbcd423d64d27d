//! Role state machines as tables of pure transition functions.
//!
//! `transition(role, &state, &event, rules)` returns `None` when the event
//! does not change anything, otherwise the next state plus one action.
//! Nothing here touches the world, the bus, or an RNG; all randomness and
//! measurement happen in perception before the lookup.
//!
//! | Role     | States                                                         |
//! |----------|----------------------------------------------------------------|
//! | forager  | searching → traveling_to_flower → foraging → returning →       |
//! |          | unloading → { recruiting → traveling_to_flower │ searching }    |
//! | receiver | waiting ⇄ receiving                                            |
//! | nurse    | tending ⇄ resting                                              |
//! | fanner   | idle ⇄ fanning                                                 |
//! | queen    | laying (periodic pheromone)                                    |
//! | drone    | wandering                                                      |

use hive_core::Role;
use hive_signal::{SignalKind, SignalPayload};

use crate::{
    Action, BehaviorState, ColonyParams, Emission, Event, Transition, Tunables,
};

/// Everything a transition may consult besides state and event.
#[derive(Copy, Clone, Debug)]
pub struct Rules<'a> {
    pub params:   &'a ColonyParams,
    pub tunables: &'a Tunables,
}

type TransitionFn = fn(&BehaviorState, &Event, Rules<'_>) -> Option<Transition>;

/// Indexed by `Role::index()`.
const TABLE: [TransitionFn; 6] = [forager, receiver, nurse, fanner, queen, drone];

/// Look up the transition for `(role, state, event)`.
pub fn transition(
    role:  Role,
    state: &BehaviorState,
    event: &Event,
    rules: Rules<'_>,
) -> Option<Transition> {
    TABLE[role.index()](state, event, rules)
}

// ── Forager ───────────────────────────────────────────────────────────────────

fn forager(state: &BehaviorState, event: &Event, rules: Rules<'_>) -> Option<Transition> {
    use BehaviorState as S;
    let p = rules.params;

    match (state, event) {
        (S::Searching, Event::FlowerFound { target, quality, recruited }) => {
            let next = S::TravelingToFlower { target: *target };
            if *recruited {
                Some(Transition::to(next))
            } else {
                // Scout: mark the newly found flower for the fanners.
                Some(Transition::emit(next, Emission::flower(SignalKind::Nasonov, *target, *quality)))
            }
        }
        (S::Searching, Event::TrembleFelt) => Some(Transition {
            next:   BehaviorState::initial(Role::Receiver, p),
            action: Action::SwitchRole(Role::Receiver),
        }),

        (S::TravelingToFlower { .. }, Event::FlowerLost) => Some(Transition::to(S::Searching)),
        (S::TravelingToFlower { target }, Event::ArrivedAtFlower { quality }) => {
            Some(Transition::to(S::Foraging { target: *target, quality: *quality }))
        }

        (S::Foraging { .. }, Event::FlowerLost) => Some(Transition::to(S::Searching)),
        (S::Foraging { target, quality }, Event::ForagingDone) => {
            Some(Transition::to(S::Returning { target: *target, quality: *quality }))
        }

        (S::Returning { target, quality }, Event::ArrivedAtHive) => {
            Some(Transition::to(S::Unloading { target: *target, quality: *quality }))
        }

        (S::Unloading { target, .. }, Event::Unloaded { quality, backlog }) => {
            if *quality > rules.tunables.tremble_threshold {
                let next = S::Recruiting {
                    target:       *target,
                    quality:      *quality,
                    remaining:    p.recruit_secs_per_quality * quality,
                    next_circuit: p.waggle_interval_secs,
                };
                Some(Transition::emit(next, Emission::flower(SignalKind::Waggle, *target, *quality)))
            } else if *backlog >= p.congestion_threshold {
                Some(Transition::emit(
                    S::Searching,
                    Emission::new(SignalKind::Tremble, SignalPayload::Congestion { backlog: *backlog }),
                ))
            } else {
                Some(Transition::to(S::Searching))
            }
        }

        (S::Recruiting { target, quality, remaining, .. }, Event::DanceCircuit) => Some(Transition::emit(
            S::Recruiting {
                target:       *target,
                quality:      *quality,
                remaining:    *remaining,
                next_circuit: p.waggle_interval_secs,
            },
            Emission::flower(SignalKind::Waggle, *target, *quality),
        )),
        (S::Recruiting { target, .. }, Event::DanceFinished { flower_alive }) => {
            if *flower_alive {
                Some(Transition::to(S::TravelingToFlower { target: *target }))
            } else {
                Some(Transition::to(S::Searching))
            }
        }

        _ => None,
    }
}

// ── Receiver ──────────────────────────────────────────────────────────────────

fn receiver(state: &BehaviorState, event: &Event, _rules: Rules<'_>) -> Option<Transition> {
    use BehaviorState as S;
    match (state, event) {
        (S::Waiting { .. }, Event::QueueNonEmpty) => Some(Transition::to(S::Receiving)),
        (S::Waiting { .. }, Event::TrembleFelt) => Some(Transition::to(S::Waiting { idle: 0.0 })),
        (S::Waiting { .. }, Event::TimerElapsed) => Some(Transition {
            next:   S::Searching,
            action: Action::SwitchRole(Role::Forager),
        }),
        (S::Receiving, Event::QueueEmpty) => Some(Transition::to(S::Waiting { idle: 0.0 })),
        _ => None,
    }
}

// ── Nurse ─────────────────────────────────────────────────────────────────────

fn nurse(state: &BehaviorState, event: &Event, rules: Rules<'_>) -> Option<Transition> {
    use BehaviorState as S;
    let p = rules.params;
    match (state, event) {
        (S::Tending { .. }, Event::TimerElapsed) => {
            Some(Transition::to(S::Resting { remaining: p.nurse_rest_secs }))
        }
        (S::Resting { .. }, Event::TimerElapsed)
        | (S::Resting { .. }, Event::SignalReceived(SignalKind::QueenMandibular)) => {
            Some(Transition::to(S::Tending { remaining: p.nurse_tend_secs }))
        }
        _ => None,
    }
}

// ── Fanner ────────────────────────────────────────────────────────────────────

fn fanner(state: &BehaviorState, event: &Event, rules: Rules<'_>) -> Option<Transition> {
    use BehaviorState as S;
    match (state, event) {
        (S::Idle, Event::SignalReceived(SignalKind::Nasonov | SignalKind::Fanning)) => Some(Transition::emit(
            S::Fanning { remaining: rules.params.fanning_secs },
            Emission::plain(SignalKind::Fanning),
        )),
        (S::Fanning { .. }, Event::TimerElapsed) => Some(Transition::to(S::Idle)),
        _ => None,
    }
}

// ── Queen ─────────────────────────────────────────────────────────────────────

fn queen(state: &BehaviorState, event: &Event, rules: Rules<'_>) -> Option<Transition> {
    match (state, event) {
        (BehaviorState::Laying { .. }, Event::TimerElapsed) => Some(Transition::emit(
            BehaviorState::Laying { until_signal: rules.params.queen_period_secs },
            Emission::plain(SignalKind::QueenMandibular),
        )),
        _ => None,
    }
}

// ── Drone ─────────────────────────────────────────────────────────────────────

fn drone(_state: &BehaviorState, _event: &Event, _rules: Rules<'_>) -> Option<Transition> {
    None
}
