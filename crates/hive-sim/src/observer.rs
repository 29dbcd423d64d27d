//! Hooks into the tick loop: per-tick reports and periodic View snapshots.

use hive_core::Tick;

use crate::View;

/// Summary of one executed tick, handed to [`SimObserver::on_tick_end`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// The tick that was executed.
    pub tick:              Tick,
    /// Simulated seconds elapsed after the tick.
    pub t:                 f64,
    /// Commands applied at the start of the tick.
    pub commands_applied:  usize,
    /// Commands that failed to apply (logged and dropped).
    pub commands_rejected: usize,
    /// Nectar handed to the receiver queue this tick.
    pub delivered:         f32,
    /// Nectar moved from the queue into `total_deposited` this tick.
    pub processed:         f32,
    pub role_changes:      usize,
    /// Agents whose update failed and were skipped for the tick.
    pub agent_errors:      usize,
    pub bees:              usize,
    pub total_deposited:   f32,
    pub receiver_queue:    f32,
    /// Signals queued on the bus after the tick.
    pub signals_queued:    usize,
    pub queue_avg:         f32,
    pub waggle_active:     usize,
    pub receivers_active:  usize,
}

/// Callbacks invoked by [`Simulation::tick`][crate::Simulation::tick] at key
/// points in the tick loop.
///
/// Every hook defaults to doing nothing.  Hooks fire for executed ticks
/// only; a paused tick applies commands and republishes the View without
/// calling any of them.
///
/// ```rust,ignore
/// /// Remembers the tick at which the receiver backlog peaked.
/// #[derive(Default)]
/// struct BacklogPeak { tick: Tick, queue: f32 }
///
/// impl SimObserver for BacklogPeak {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.receiver_queue > self.queue {
///             self.tick = report.tick;
///             self.queue = report.receiver_queue;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each executed tick, after queued commands
    /// have been applied.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each executed tick.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called at output intervals (every `config.output_interval_ticks`
    /// executed ticks) with the freshly published View.
    fn on_view(&mut self, _view: &View) {}

    /// Called once by [`Simulation::finish`][crate::Simulation::finish].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
