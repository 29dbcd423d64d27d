//! The `Simulation` struct and its tick loop.

use std::f32::consts::PI;
use std::sync::Arc;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use hive_agent::{Agent, AgentContext, ColonyParams, Tunables};
use hive_core::{AgentId, AgentRng, BeeKind, CoreResult, FlowerId, Role, SimClock, SimConfig, SimRng, Vec2};
use hive_signal::{BusStats, Signal, SignalBus};
use hive_world::World;

use crate::command::{
    Command, CommandError, CommandReceiver, CommandSender, MAX_SPEED, ParamKey, WeatherOp, command_channel,
};
use crate::{BeeView, SimObserver, SimResult, SimSettings, StatsView, TickReport, View, WorldView};

// ── Simulation ────────────────────────────────────────────────────────────────

/// The colony scheduler.
///
/// `Simulation` owns every piece of mutable state and advances it one tick
/// at a time:
///
/// 0. **Commands**: drain the command queue and apply each command in FIFO
///    order.  This happens even while paused; a paused tick then republishes
///    the View and stops.
/// 1. **Signals**: purge expired signals, then drain one inbox per role
///    present in the colony.
/// 2. **Agents**: update every agent once, in ascending `AgentId` order.
/// 3. **Movement**: apply each agent's displacement and clamp it into the
///    world.  Non-finite positions are reset to the hive centre.
/// 4. **Economy**: let receiving bees process the backlog into
///    `total_deposited`, then enqueue this tick's deliveries, which are
///    processed from the next tick on.  Advance the weather.
/// 5. **Publish**: sample bus statistics, advance the clock, compose a new
///    [`View`] and publish it.
///
/// Create via [`SimBuilder`][crate::SimBuilder] or [`Simulation::new`].
pub struct Simulation {
    pub config: SimConfig,

    pub clock: SimClock,

    pub world: World,

    /// Colony parameters.  `tunables` holds the values handed to new bees.
    pub params: ColonyParams,

    pub bus: SignalBus,

    /// Ascending `AgentId`; ids are never reused.
    agents: Vec<Agent>,

    /// Per-agent RNGs, parallel to `agents`.
    rngs: Vec<AgentRng>,

    /// Drives placement of new bees and flowers.
    sim_rng: SimRng,

    next_id: AgentId,

    paused: bool,

    speed: f32,

    /// Bees that perceived a signal on the last executed tick.
    receivers_active: usize,

    commands: CommandReceiver,

    command_tx: CommandSender,

    view_tx: watch::Sender<Arc<View>>,
}

impl Simulation {
    /// Create an empty, unpaused colony: a hive, no flowers, no bees.
    pub fn new(settings: SimSettings) -> SimResult<Self> {
        settings.validate()?;
        let SimSettings { sim: config, world, bus, colony: params } = settings;

        let world = World::new(config.width, config.height, world);
        let bus = SignalBus::new(bus)?;
        let clock = config.make_clock();
        let (command_tx, commands) = command_channel(config.command_capacity);

        let initial = compose_view(&clock, false, 1.0, &[], &world, &bus.stats(), 0);
        let (view_tx, _) = watch::channel(Arc::new(initial));

        Ok(Self {
            sim_rng: SimRng::new(config.seed),
            config,
            clock,
            world,
            params,
            bus,
            agents: Vec::new(),
            rngs: Vec::new(),
            next_id: AgentId(0),
            paused: false,
            speed: 1.0,
            receivers_active: 0,
            commands,
            command_tx,
            view_tx,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| &self.agents[i])
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// A new producer handle for the command queue.
    pub fn command_sender(&self) -> CommandSender {
        self.command_tx.clone()
    }

    /// Validate and enqueue `command` for the next tick boundary.
    pub fn submit(&self, command: Command) -> Result<(), CommandError> {
        self.command_tx.submit(command)
    }

    /// A receiver that always holds the most recently published View.
    pub fn subscribe(&self) -> watch::Receiver<Arc<View>> {
        self.view_tx.subscribe()
    }

    /// The most recently published View.
    pub fn latest_view(&self) -> Arc<View> {
        self.view_tx.borrow().clone()
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Add `count` bees near the hive centre.  `role = None` uses the kind's
    /// default role.
    pub fn spawn_bees(&mut self, count: usize, kind: BeeKind, role: Option<Role>) -> CoreResult<Vec<AgentId>> {
        let role = role.unwrap_or(kind.default_role());
        kind.check_role(role)?;

        let bounds = self.world.bounds();
        let (center, radius) = (self.world.hive.center, self.world.hive.radius);
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_id;
            let pos = bounds.clamp(self.sim_rng.point_in_disc(center, radius * 0.5));
            let heading = PI - self.sim_rng.angle();
            self.agents.push(Agent::new(id, kind, role, pos, heading, &self.params)?);
            self.rngs.push(AgentRng::new(self.config.seed, id));
            self.next_id = id.next();
            ids.push(id);
        }
        debug!(count, %kind, %role, "spawned bees");
        Ok(ids)
    }

    /// Add one random patch of `count` flowers.
    pub fn add_flowers(&mut self, count: usize) -> Vec<FlowerId> {
        self.world.add_flowers(count, &mut self.sim_rng)
    }

    /// Add `n` flowers clustered around `at`.
    pub fn add_flower_at(&mut self, at: Vec2, n: usize, capacity: Option<f32>) -> SimResult<Vec<FlowerId>> {
        Ok(self.world.add_flower_at(at, n, capacity, &mut self.sim_rng)?)
    }

    /// Set a tunable on the colony defaults and on every existing bee.
    pub fn set_param(&mut self, key: ParamKey, value: f32) -> Result<(), CommandError> {
        key.check(value)?;
        let set = |t: &mut Tunables| match key {
            ParamKey::ReceiverRate => t.receiver_rate = value,
            ParamKey::TrembleThreshold => t.tremble_threshold = value,
        };
        set(&mut self.params.tunables);
        for agent in &mut self.agents {
            set(&mut agent.tunables);
        }
        Ok(())
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run exactly `n` scheduler ticks, paused ones included.  Returns the
    /// number of ticks actually executed.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        let mut executed = 0;
        for _ in 0..n {
            if self.tick(observer).is_some() {
                executed += 1;
            }
        }
        executed
    }

    /// [`Simulation::tick`] without an observer.
    pub fn step(&mut self) -> Option<TickReport> {
        self.tick(&mut crate::NoopObserver)
    }

    /// Signal the end of a run to `observer`.
    pub fn finish<O: SimObserver>(&self, observer: &mut O) {
        observer.on_sim_end(self.clock.current_tick);
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Run one scheduler tick.  Returns `None` if the colony is paused after
    /// command application, in which case nothing but the commands took
    /// effect.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> Option<TickReport> {
        // ── Phase 0: commands ─────────────────────────────────────────────
        let (applied, rejected) = self.apply_commands();
        if self.paused {
            self.republish();
            return None;
        }

        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let dt = self.clock.scaled_dt(self.speed);
        let mut report = TickReport {
            tick: now,
            commands_applied: applied,
            commands_rejected: rejected,
            ..TickReport::default()
        };

        // ── Phase 1: signals ──────────────────────────────────────────────
        self.bus.purge_expired(now);
        let mut inboxes: [Vec<Signal>; Role::ALL.len()] = std::array::from_fn(|_| Vec::new());
        for role in Role::ALL {
            if self.agents.iter().any(|a| a.role == role) {
                inboxes[role.index()] = self.bus.drain(role);
            }
        }

        // ── Phase 2: agents ───────────────────────────────────────────────
        let mut receive_capacity = 0.0;
        let mut receivers_active = 0;
        for (agent, rng) in self.agents.iter_mut().zip(self.rngs.iter_mut()) {
            let mut ctx = AgentContext {
                tick: now,
                dt,
                world: &mut self.world,
                bus: &mut self.bus,
                params: &self.params,
                rng,
                role_inbox: &inboxes[agent.role.index()],
            };
            let id = agent.id;
            let Some(out) = checked(agent.update(&mut ctx), "agent update failed", id) else {
                report.agent_errors += 1;
                continue;
            };
            report.delivered += out.delivered;
            receive_capacity += out.receive_capacity;
            if out.perceived {
                receivers_active += 1;
            }
            if let Some((from, to)) = out.role_change {
                debug!(agent = %id, %from, %to, "role switch");
                report.role_changes += 1;
            }
        }
        self.receivers_active = receivers_active;

        // ── Phase 3: movement ─────────────────────────────────────────────
        let bounds = self.world.bounds();
        let fallback = self.world.hive.center;
        for agent in &mut self.agents {
            let next = agent.pos + agent.displacement(dt);
            if next.is_finite() {
                agent.pos = bounds.clamp(next);
            } else {
                warn!(agent = %agent.id, heading = agent.heading, speed = agent.speed, "non-finite position; resetting to hive centre");
                debug_assert!(next.is_finite(), "agent {} moved to a non-finite position", agent.id);
                agent.pos = fallback;
                agent.heading = 0.0;
                agent.speed = 0.0;
            }
        }

        // ── Phase 4: economy ──────────────────────────────────────────────
        // Receivers work the backlog as it stood before this tick's unloads.
        if receive_capacity > 0.0 {
            report.processed = checked(self.world.receive(receive_capacity), "receive failed", now).unwrap_or(0.0);
        }
        if report.delivered > 0.0 {
            checked(self.world.enqueue_delivery(report.delivered), "delivery rejected", now);
        }
        self.world.weather.step(dt);

        // ── Phase 5: publish ──────────────────────────────────────────────
        let stats = self.bus.sample();
        self.clock.advance(dt);
        report.t = self.clock.elapsed;

        let view = Arc::new(self.compose(&stats));
        self.view_tx.send_replace(Arc::clone(&view));
        report.bees = view.bees.len();
        report.total_deposited = self.world.total_deposited();
        report.receiver_queue = self.world.hive.receiver_queue;
        report.signals_queued = stats.total;
        report.queue_avg = stats.queue_avg;
        report.waggle_active = view.stats.waggle_active;
        report.receivers_active = receivers_active;

        trace!(
            tick = %now,
            delivered = report.delivered,
            processed = report.processed,
            signals = stats.total,
            "tick complete"
        );
        observer.on_tick_end(&report);
        let interval = self.config.output_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_view(&view);
        }
        Some(report)
    }

    /// Drain the command queue.  Returns `(applied, rejected)`.
    fn apply_commands(&mut self) -> (usize, usize) {
        let (mut applied, mut rejected) = (0, 0);
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    debug!(?command, "applying command");
                    match self.apply(command) {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            warn!(error = %e, "command rejected at apply");
                            rejected += 1;
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        (applied, rejected)
    }

    fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        command.validate()?;
        match command {
            Command::Toggle => self.paused = !self.paused,
            Command::Play => self.paused = false,
            Command::Pause => self.paused = true,
            Command::Speed { value } => self.speed = value.clamp(0.0, MAX_SPEED),
            Command::AddBees { count, kind, role } => {
                self.spawn_bees(count, kind, role)?;
            }
            Command::AddFlowers { count } => {
                self.add_flowers(count);
            }
            Command::AddFlowerAt { x, y, n, capacity } => {
                self.world.add_flower_at(Vec2::new(x, y), n, capacity, &mut self.sim_rng)?;
            }
            Command::SetParam { key, value } => self.set_param(key, value)?,
            Command::Weather(op) => {
                let weather = &mut self.world.weather;
                match op {
                    WeatherOp::Mode(mode) => weather.set_mode(mode),
                    WeatherOp::Flow(flow) => weather.set_flow(flow),
                    WeatherOp::Rain(rain) => weather.set_rain(rain),
                }
                debug!(
                    mode = %weather.mode(),
                    flow = weather.nectar_flow(),
                    open = weather.foraging_open(),
                    "weather changed"
                );
            }
        }
        Ok(())
    }

    /// Seed the run state and publish a View of the seeded colony.
    pub(crate) fn set_run_state(&mut self, paused: bool, speed: f32) {
        self.paused = paused;
        self.speed = speed;
        self.republish();
    }

    /// Publish the current state without sampling the bus.
    fn republish(&self) {
        let view = self.compose(&self.bus.stats());
        self.view_tx.send_replace(Arc::new(view));
    }

    fn compose(&self, stats: &BusStats) -> View {
        compose_view(
            &self.clock,
            self.paused,
            self.speed,
            &self.agents,
            &self.world,
            stats,
            self.receivers_active,
        )
    }
}

fn compose_view(
    clock: &SimClock,
    paused: bool,
    speed: f32,
    agents: &[Agent],
    world: &World,
    stats: &BusStats,
    receivers_active: usize,
) -> View {
    let bounds = world.bounds();
    View {
        t: clock.elapsed,
        tick: clock.current_tick.0,
        paused,
        speed,
        width: bounds.width,
        height: bounds.height,
        bees: agents.iter().map(BeeView::of).collect(),
        world: WorldView::of(world),
        stats: StatsView::compose(agents, world, stats, receivers_active),
    }
}

/// Unwrap a result whose error means an invariant broke: fatal in debug
/// builds, logged and skipped in release.
fn checked<T, E, C>(result: Result<T, E>, what: &'static str, at: C) -> Option<T>
where
    E: std::fmt::Display,
    C: std::fmt::Display,
{
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(%at, error = %e, "{what}");
            if cfg!(debug_assertions) {
                panic!("{what} at {at}: {e}");
            }
            None
        }
    }
}
