//! Plain data rows written by output backends.

use hive_sim::{BeeView, TickReport};

/// One bee at one output interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BeeSnapshotRow {
    pub bee_id:   u32,
    pub tick:     u64,
    pub x:        f32,
    pub y:        f32,
    pub kind:     &'static str,
    pub role:     &'static str,
    pub state:    String,
    pub carrying: f32,
}

impl BeeSnapshotRow {
    pub fn of(bee: &BeeView, tick: u64) -> Self {
        Self {
            bee_id:   bee.id,
            tick,
            x:        bee.x,
            y:        bee.y,
            kind:     bee.kind.name(),
            role:     bee.role.name(),
            state:    bee.state.clone(),
            carrying: bee.carrying,
        }
    }
}

/// Colony totals after one executed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:             u64,
    /// Simulated seconds after the tick.
    pub t:                f64,
    pub bees:             u64,
    pub delivered:        f32,
    pub processed:        f32,
    pub total_deposited:  f32,
    pub receiver_queue:   f32,
    pub signals_queued:   u64,
    pub queue_avg:        f32,
    pub waggle_active:    u64,
    pub receivers_active: u64,
    pub role_changes:     u64,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(r: &TickReport) -> Self {
        Self {
            tick:             r.tick.0,
            t:                r.t,
            bees:             r.bees as u64,
            delivered:        r.delivered,
            processed:        r.processed,
            total_deposited:  r.total_deposited,
            receiver_queue:   r.receiver_queue,
            signals_queued:   r.signals_queued as u64,
            queue_avg:        r.queue_avg,
            waggle_active:    r.waggle_active as u64,
            receivers_active: r.receivers_active as u64,
            role_changes:     r.role_changes as u64,
        }
    }
}
