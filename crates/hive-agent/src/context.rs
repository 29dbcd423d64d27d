//! The mutable slice of simulation state one agent sees during its update.

use hive_core::{AgentRng, Tick};
use hive_signal::{Signal, SignalBus};
use hive_world::World;

use crate::ColonyParams;

/// Passed to [`Agent::update`][crate::Agent::update].
///
/// Built by the scheduler once per agent per tick.  Agents are updated
/// sequentially in ascending id order, so exclusive borrows of the world and
/// bus are safe and the order of side effects is deterministic.
pub struct AgentContext<'a> {
    /// Current simulation tick (stamped on emitted signals).
    pub tick: Tick,

    /// Simulated seconds covered by this tick (`dt × speed`).
    pub dt: f32,

    pub world: &'a mut World,

    pub bus: &'a mut SignalBus,

    pub params: &'a ColonyParams,

    /// This agent's RNG.
    pub rng: &'a mut AgentRng,

    /// Everything drained this tick for the agent's role, in emission order.
    pub role_inbox: &'a [Signal],
}
