//! Per-subscriber View republishing.
//!
//! Each subscriber gets its own task that wakes at the subscriber's rate,
//! reads the latest published View, and offers it to the sink with a
//! non-blocking send.  Missed timer ticks are skipped and frames the sink
//! cannot take are dropped, so a slow consumer only ever sees fewer, newer
//! frames.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, trace, warn};

use hive_sim::View;

use crate::protocol::{MAX_HZ, MIN_HZ, ServerMessage};
use crate::{FrameSink, SinkError};

pub type SessionId = u64;

struct Subscription {
    generation: u64,
    hz:         u32,
    task:       JoinHandle<()>,
}

/// The set of active View subscribers.
///
/// Must be used from within a tokio runtime: subscribing spawns a task.
pub struct FanOut {
    views:      watch::Receiver<Arc<View>>,
    subs:       Arc<DashMap<SessionId, Subscription>>,
    generation: AtomicU64,
}

impl FanOut {
    pub fn new(views: watch::Receiver<Arc<View>>) -> Self {
        Self { views, subs: Arc::new(DashMap::new()), generation: AtomicU64::new(0) }
    }

    /// Start pushing Views to `sink` at `hz`, replacing any earlier
    /// subscription of `session`.
    pub fn subscribe<S: FrameSink>(&self, session: SessionId, sink: Arc<S>, hz: u32) {
        let hz = hz.clamp(MIN_HZ, MAX_HZ);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        // The slot stays locked until the new subscription is in place, so a
        // task that ends at once cannot run its cleanup before the insert.
        let slot = self.subs.entry(session);
        let task = tokio::spawn(republish(
            session,
            generation,
            sink,
            self.views.clone(),
            hz,
            Arc::clone(&self.subs),
        ));
        let subscription = Subscription { generation, hz, task };
        match slot {
            Entry::Occupied(mut slot) => {
                let old = slot.insert(subscription);
                old.task.abort();
                debug!(session, old_hz = old.hz, hz, "subscription replaced");
            }
            Entry::Vacant(slot) => {
                slot.insert(subscription);
                info!(session, hz, "subscriber added");
            }
        }
    }

    /// Stop pushing to `session`.  Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, session: SessionId) -> bool {
        match self.subs.remove(&session) {
            Some((_, sub)) => {
                sub.task.abort();
                info!(session, "subscriber removed");
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self, session: SessionId) -> bool {
        self.subs.contains_key(&session)
    }

    /// The subscribed rate of `session`.
    pub fn hz(&self, session: SessionId) -> Option<u32> {
        self.subs.get(&session).map(|s| s.hz)
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

impl Drop for FanOut {
    fn drop(&mut self) {
        for sub in self.subs.iter() {
            sub.task.abort();
        }
    }
}

async fn republish<S: FrameSink>(
    session: SessionId,
    generation: u64,
    sink: Arc<S>,
    mut views: watch::Receiver<Arc<View>>,
    hz: u32,
    subs: Arc<DashMap<SessionId, Subscription>>,
) {
    let mut ticker = interval(Duration::from_secs_f64(1.0 / f64::from(hz)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let view = Arc::clone(&views.borrow_and_update());
        let frame = match (ServerMessage::View { payload: &view }).to_json() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(session, error = %e, "failed to encode view frame");
                continue;
            }
        };
        match sink.try_send(frame) {
            Ok(()) => {}
            Err(SinkError::Full) => trace!(session, tick = view.tick, "subscriber lagging; frame dropped"),
            Err(SinkError::Closed) => {
                debug!(session, "subscriber sink closed");
                break;
            }
        }
    }
    subs.remove_if(&session, |_, sub| sub.generation == generation);
}
