//! Runs a [`Simulation`] on a tokio task at its configured tick rate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use hive_sim::{CommandSender, NoopObserver, Simulation, View};

use crate::fanout::FanOut;
use crate::session::Session;
use crate::{BridgeResult, FrameSink};

pub struct SimDriver;

impl SimDriver {
    /// Move `sim` onto a new task that ticks it every `1 / tick_hz` seconds
    /// until [`DriverHandle::shutdown`].
    pub fn spawn(sim: Simulation) -> DriverHandle {
        let commands = sim.command_sender();
        let views = sim.subscribe();
        let fanout = Arc::new(FanOut::new(views.clone()));
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(drive(sim, stop_rx));
        DriverHandle { commands, views, fanout, next_session: AtomicU64::new(0), stop: stop_tx, task }
    }
}

async fn drive(mut sim: Simulation, mut stop: oneshot::Receiver<()>) -> Simulation {
    let hz = sim.config.tick_hz.max(1);
    let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(hz)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(hz, "simulation driver started");
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                sim.tick(&mut NoopObserver);
            }
        }
    }
    info!(tick = %sim.clock.current_tick, "simulation driver stopped");
    sim
}

/// Access to a running simulation: command submission, the latest View,
/// and client sessions.
pub struct DriverHandle {
    commands:     CommandSender,
    views:        watch::Receiver<Arc<View>>,
    fanout:       Arc<FanOut>,
    next_session: AtomicU64,
    stop:         oneshot::Sender<()>,
    task:         JoinHandle<Simulation>,
}

impl DriverHandle {
    pub fn commands(&self) -> CommandSender {
        self.commands.clone()
    }

    pub fn views(&self) -> watch::Receiver<Arc<View>> {
        self.views.clone()
    }

    pub fn latest_view(&self) -> Arc<View> {
        Arc::clone(&self.views.borrow())
    }

    pub fn fanout(&self) -> &Arc<FanOut> {
        &self.fanout
    }

    /// Open a client session whose replies and View frames go to `sink`.
    pub fn connect<S: FrameSink>(&self, sink: Arc<S>) -> Session<S> {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        Session::new(id, sink, self.commands.clone(), Arc::clone(&self.fanout))
    }

    /// Stop ticking and hand the simulation back.
    pub async fn shutdown(self) -> BridgeResult<Simulation> {
        // The task may already have finished; its result is still collected.
        let _ = self.stop.send(());
        Ok(self.task.await?)
    }
}
