//! The `Agent` record and its per-tick update.

use std::f32::consts::{PI, TAU};

use hive_core::{AgentId, AgentRng, BeeKind, CoreResult, FlowerId, Role, Vec2};
use hive_signal::{Inbox, Signal, SignalKind};
use hive_world::{NECTAR_EPS, World};

use crate::{
    Action, AgentContext, AgentError, AgentResult, BehaviorState, ColonyParams, Emission, Event,
    FlowerTarget, Rules, Transition, Tunables, transition,
};

/// What one agent update contributed to the rest of the tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// Nectar handed to the receiver queue.
    pub delivered: f32,
    /// Queue-processing capacity offered by a receiving bee.
    pub receive_capacity: f32,
    /// `true` if the agent perceived at least one signal.
    pub perceived: bool,
    /// `(from, to)` when the agent changed role.
    pub role_change: Option<(Role, Role)>,
}

/// One bee.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id:         AgentId,
    pub kind:       BeeKind,
    pub role:       Role,
    pub pos:        Vec2,
    /// Radians, `atan2` convention, in `(-π, π]`.
    pub heading:    f32,
    /// World units per simulated second, set by steering.
    pub speed:      f32,
    pub carrying:   f32,
    pub state:      BehaviorState,
    /// Seconds left on the emission hint.
    pub flash:      f32,
    pub flash_kind: Option<SignalKind>,
    pub tunables:   Tunables,
    /// Seconds spent in the current role.
    pub role_age:   f32,
}

impl Agent {
    /// Create a bee in the initial state of `role`.
    pub fn new(
        id: AgentId,
        kind: BeeKind,
        role: Role,
        pos: Vec2,
        heading: f32,
        params: &ColonyParams,
    ) -> CoreResult<Self> {
        kind.check_role(role)?;
        Ok(Self {
            id,
            kind,
            role,
            pos,
            heading,
            speed: 0.0,
            carrying: 0.0,
            state: BehaviorState::initial(role, params),
            flash: 0.0,
            flash_kind: None,
            tunables: params.tunables,
            role_age: 0.0,
        })
    }

    /// Run one full perceive / decide / act / steer cycle.
    pub fn update(&mut self, ctx: &mut AgentContext<'_>) -> AgentResult<StepOutcome> {
        let inbox = Inbox::gather(ctx.role_inbox, self.id, self.pos, ctx.params.inbox_capacity);
        ctx.bus.record_inbox_drops(&inbox);
        let mut out = StepOutcome { perceived: !inbox.is_empty(), ..StepOutcome::default() };

        self.advance_clocks(ctx.dt);
        let event = self.perceive(&inbox, ctx, &mut out)?;

        let rules = Rules { params: ctx.params, tunables: &self.tunables };
        if let Some(t) = transition(self.role, &self.state, &event, rules) {
            self.apply(t, ctx, &mut out)?;
        }

        self.steer(ctx);
        Ok(out)
    }

    /// Movement for this tick, applied by the scheduler.
    #[inline]
    pub fn displacement(&self, dt: f32) -> Vec2 {
        Vec2::from_angle(self.heading) * (self.speed * dt)
    }

    /// Travel speed towards a target.
    pub fn cruise_speed(&self, params: &ColonyParams) -> f32 {
        let (lo, hi) = self.kind.speed_range();
        (lo + hi) * 0.5 * params.cruise_scale
    }

    fn advance_clocks(&mut self, dt: f32) {
        self.role_age += dt;
        if self.flash > 0.0 {
            self.flash = (self.flash - dt).max(0.0);
            if self.flash == 0.0 {
                self.flash_kind = None;
            }
        }
    }

    // ── Perception ────────────────────────────────────────────────────────

    fn perceive(
        &mut self,
        inbox: &Inbox,
        ctx: &mut AgentContext<'_>,
        out: &mut StepOutcome,
    ) -> AgentResult<Event> {
        use BehaviorState as S;
        let dt = ctx.dt;
        let p = ctx.params;

        let event = match self.state {
            S::Searching => {
                // Nothing to find while foraging is closed; stay home.
                let found = if ctx.world.weather.foraging_open() {
                    self.choose_flower(inbox, ctx.world, p)
                } else {
                    None
                };
                if let Some((target, quality, recruited)) = found {
                    Event::FlowerFound { target, quality, recruited }
                } else if inbox.has(SignalKind::Tremble)
                    && self.kind == BeeKind::Worker
                    && self.role_age >= p.role_min_dwell_secs
                    && ctx.rng.chance(p.tremble_switch_prob)
                {
                    Event::TrembleFelt
                } else {
                    Event::Idle
                }
            }

            S::TravelingToFlower { target } => match ctx.world.flower(target.flower) {
                Some(f) if f.is_available() => {
                    if self.pos.distance(target.pos) <= p.arrive_radius {
                        Event::ArrivedAtFlower { quality: f.fraction() }
                    } else {
                        Event::Idle
                    }
                }
                _ => Event::FlowerLost,
            },

            S::Foraging { target, .. } => {
                let flow = ctx.world.weather.nectar_flow();
                let room = (p.forager_capacity - self.carrying).max(0.0);
                let taken = ctx
                    .world
                    .consume_flower(target.flower, (p.forage_rate * flow * dt).min(room))
                    .map_err(|source| AgentError::World { agent: self.id, source })?;
                self.carrying += taken;

                let depleted = !ctx.world.flower(target.flower).is_some_and(|f| f.is_available());
                // Rain, dusk or a dry flow send the bee home with what it has.
                let halted = !ctx.world.weather.foraging_open() || flow <= NECTAR_EPS;
                if self.carrying >= p.forager_capacity - NECTAR_EPS {
                    Event::ForagingDone
                } else if depleted || halted {
                    if self.carrying > NECTAR_EPS { Event::ForagingDone } else { Event::FlowerLost }
                } else {
                    Event::Idle
                }
            }

            S::Returning { .. } => {
                if self.pos.distance(ctx.world.hive.entrance) <= p.arrive_radius {
                    Event::ArrivedAtHive
                } else {
                    Event::Idle
                }
            }

            S::Unloading { quality, .. } => {
                let backlog = ctx.world.hive.receiver_queue;
                out.delivered = self.carrying;
                self.carrying = 0.0;
                Event::Unloaded { quality, backlog }
            }

            S::Recruiting { target, quality, remaining, next_circuit } => {
                let remaining = remaining - dt;
                let next_circuit = next_circuit - dt;
                self.state = S::Recruiting { target, quality, remaining, next_circuit };
                if remaining <= 0.0 {
                    let flower_alive = ctx.world.flower(target.flower).is_some_and(|f| f.is_available());
                    Event::DanceFinished { flower_alive }
                } else if next_circuit <= 0.0 {
                    Event::DanceCircuit
                } else {
                    Event::Idle
                }
            }

            S::Waiting { idle } => {
                if ctx.world.has_backlog() {
                    Event::QueueNonEmpty
                } else {
                    let idle = idle + dt;
                    self.state = S::Waiting { idle };
                    if inbox.has(SignalKind::Tremble) {
                        Event::TrembleFelt
                    } else if idle >= p.receiver_idle_secs && self.kind == BeeKind::Worker {
                        Event::TimerElapsed
                    } else {
                        Event::Idle
                    }
                }
            }

            S::Receiving => {
                if !ctx.world.has_backlog() {
                    Event::QueueEmpty
                } else {
                    if ctx.world.hive.contains(self.pos) {
                        out.receive_capacity = self.tunables.receiver_rate * dt;
                    }
                    Event::Idle
                }
            }

            S::Tending { remaining } => {
                let remaining = remaining - dt;
                self.state = S::Tending { remaining };
                if remaining <= 0.0 { Event::TimerElapsed } else { Event::Idle }
            }

            S::Resting { remaining } => {
                let remaining = remaining - dt;
                self.state = S::Resting { remaining };
                if inbox.has(SignalKind::QueenMandibular) {
                    Event::SignalReceived(SignalKind::QueenMandibular)
                } else if remaining <= 0.0 {
                    Event::TimerElapsed
                } else {
                    Event::Idle
                }
            }

            S::Idle => {
                if inbox.has(SignalKind::Nasonov) {
                    Event::SignalReceived(SignalKind::Nasonov)
                } else if inbox.has(SignalKind::Fanning) {
                    Event::SignalReceived(SignalKind::Fanning)
                } else {
                    Event::Idle
                }
            }

            S::Fanning { remaining } => {
                let remaining = remaining - dt;
                self.state = S::Fanning { remaining };
                if remaining <= 0.0 { Event::TimerElapsed } else { Event::Idle }
            }

            S::Laying { until_signal } => {
                let until_signal = until_signal - dt;
                self.state = S::Laying { until_signal };
                if until_signal <= 0.0 { Event::TimerElapsed } else { Event::Idle }
            }

            S::Wandering => match inbox.signals().first() {
                Some(s) => Event::SignalReceived(s.kind),
                None => Event::Idle,
            },
        };
        Ok(event)
    }

    /// Nearest flower among those sensed directly and those advertised by
    /// waggles in the inbox.  Ties go to the lowest flower id; a flower both
    /// sensed and advertised counts as sensed.
    fn choose_flower(
        &self,
        inbox: &Inbox,
        world: &World,
        p: &ColonyParams,
    ) -> Option<(FlowerTarget, f32, bool)> {
        let mut best: Option<(f32, FlowerId, bool)> = None;
        let mut consider = |id: FlowerId, recruited: bool| {
            let Some(f) = world.flower(id) else { return };
            if !f.is_available() {
                return;
            }
            let d = self.pos.distance_sq(f.pos);
            let better = match best {
                None => true,
                Some((bd, bid, _)) => d.total_cmp(&bd).then(id.cmp(&bid)).is_lt(),
            };
            if better {
                best = Some((d, id, recruited));
            }
        };

        if let Some(id) = world.nearest_available_within(self.pos, p.sensing_radius) {
            consider(id, false);
        }
        for s in inbox.of_kind(SignalKind::Waggle) {
            if let Some((id, _, _)) = s.flower() {
                consider(id, true);
            }
        }

        let (_, id, recruited) = best?;
        let f = world.flower(id)?;
        Some((FlowerTarget { flower: id, pos: f.pos }, f.fraction(), recruited))
    }

    // ── Actions ───────────────────────────────────────────────────────────

    fn apply(
        &mut self,
        t: Transition,
        ctx: &mut AgentContext<'_>,
        out: &mut StepOutcome,
    ) -> AgentResult<()> {
        if let Action::SwitchRole(role) = t.action {
            self.kind.check_role(role)?;
        }
        self.state = t.next;
        match t.action {
            Action::None => {}
            Action::Emit(emission) => self.emit(emission, ctx)?,
            Action::SwitchRole(role) => {
                out.role_change = Some((self.role, role));
                self.role = role;
                self.role_age = 0.0;
            }
        }
        Ok(())
    }

    fn emit(&mut self, emission: Emission, ctx: &mut AgentContext<'_>) -> AgentResult<()> {
        let kind = emission.kind;
        let signal = Signal::new(
            kind,
            self.id,
            self.pos,
            ctx.params.range_of(kind),
            emission.payload,
            ctx.tick,
            ctx.params.ttl_of(kind),
        );
        ctx.bus
            .emit(signal)
            .map_err(|source| AgentError::Signal { agent: self.id, source })?;
        self.flash = ctx.params.flash_secs;
        self.flash_kind = Some(kind);
        Ok(())
    }

    // ── Steering ──────────────────────────────────────────────────────────

    fn steer(&mut self, ctx: &mut AgentContext<'_>) {
        use BehaviorState as S;
        let p = ctx.params;
        let dt = ctx.dt;
        let entrance = ctx.world.hive.entrance;
        let centre = ctx.world.hive.center;
        let nest = ctx.world.hive.radius * 0.6;

        match self.state {
            S::TravelingToFlower { target } => self.head_to(target.pos, dt, p),
            S::Returning { .. } => self.head_to(entrance, dt, p),
            S::Foraging { .. } | S::Unloading { .. } => self.speed = 0.0,
            S::Recruiting { .. } => {
                // Circle on the spot.
                self.speed = 0.0;
                self.heading = wrap_angle(self.heading + PI * dt);
            }
            S::Searching if !ctx.world.weather.foraging_open() => self.stay_near(centre, nest, dt, ctx.rng, p),
            S::Searching | S::Wandering => self.wander(ctx.rng, p, 1.0),
            S::Waiting { .. }
            | S::Receiving
            | S::Tending { .. }
            | S::Resting { .. }
            | S::Laying { .. } => self.stay_near(centre, nest, dt, ctx.rng, p),
            S::Idle | S::Fanning { .. } => {
                if self.pos.distance(entrance) > p.arrive_radius {
                    self.head_to(entrance, dt, p);
                } else {
                    self.speed = 0.0;
                }
            }
        }
    }

    /// Fly straight at `target` without overshooting it this tick.
    fn head_to(&mut self, target: Vec2, dt: f32, p: &ColonyParams) {
        let dist = self.pos.distance(target);
        if dist > 0.0 {
            self.heading = self.pos.angle_to(target);
        }
        let cruise = self.cruise_speed(p);
        self.speed = if dt > 0.0 { cruise.min(dist / dt) } else { cruise };
    }

    fn wander(&mut self, rng: &mut AgentRng, p: &ColonyParams, scale: f32) {
        let (lo, hi) = self.kind.speed_range();
        self.heading = wrap_angle(self.heading + rng.jitter(self.kind.turn_noise()));
        self.speed = rng.uniform(lo..=hi) * p.wander_scale * scale;
    }

    /// Wander slowly while within `radius` of `anchor`, otherwise head back.
    fn stay_near(&mut self, anchor: Vec2, radius: f32, dt: f32, rng: &mut AgentRng, p: &ColonyParams) {
        if self.pos.distance(anchor) > radius {
            self.head_to(anchor, dt, p);
        } else {
            self.wander(rng, p, 0.5);
        }
    }
}

/// Normalise to `(-π, π]`.
#[inline]
fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}
