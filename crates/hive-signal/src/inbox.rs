//! Per-agent inbox.

use hive_core::{AgentId, Vec2};

use crate::{Signal, SignalKind};

/// The signals one agent perceives this tick.
///
/// Built from its role's drained signals by keeping those in scope at the
/// agent's position, excluding its own emissions, and capping each kind at
/// `per_kind_cap` (newest win).  Signals are kept in emission order.
#[derive(Clone, Debug, Default)]
pub struct Inbox {
    signals: Vec<Signal>,
    dropped: [u32; SignalKind::COUNT],
}

impl Inbox {
    pub fn gather(role_inbox: &[Signal], me: AgentId, pos: Vec2, per_kind_cap: usize) -> Self {
        let mut counts = [0usize; SignalKind::COUNT];
        let visible: Vec<&Signal> = role_inbox
            .iter()
            .filter(|s| s.emitter != me && s.reaches(pos))
            .inspect(|s| counts[s.kind.index()] += 1)
            .collect();

        // Skip the oldest `count - cap` of each kind.
        let mut skip = counts.map(|c| c.saturating_sub(per_kind_cap));
        let dropped = skip.map(|n| n as u32);
        let mut signals = Vec::with_capacity(visible.len());
        for s in visible {
            let k = s.kind.index();
            if skip[k] > 0 {
                skip[k] -= 1;
            } else {
                signals.push(s.clone());
            }
        }
        Self { signals, dropped }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Signals of `kind`, oldest first.
    pub fn of_kind(&self, kind: SignalKind) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(move |s| s.kind == kind)
    }

    pub fn has(&self, kind: SignalKind) -> bool {
        self.signals.iter().any(|s| s.kind == kind)
    }

    /// In-scope signals of `kind` discarded by the per-kind cap.
    pub fn dropped(&self, kind: SignalKind) -> u32 {
        self.dropped[kind.index()]
    }

    pub fn total_dropped(&self) -> u32 {
        self.dropped.iter().sum()
    }
}
