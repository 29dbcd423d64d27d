//! `SignalBus`: one bounded FIFO queue per signal kind.
//!
//! # Delivery
//!
//! Each queued entry carries the set of subscribing roles that have not yet
//! drained it.  `drain(role)` hands the role every entry still pending for it
//! and clears that role's bit; an entry leaves its queue once no bits remain.
//! Entries whose subscribers are not present in the colony are never drained
//! and simply age out through `purge_expired`.
//!
//! # Backpressure
//!
//! A queue at capacity evicts its oldest entry to make room.  Evictions and
//! per-agent inbox overflow are counted per kind and surfaced through
//! [`BusStats`]; neither is an error.

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

use hive_core::{Role, Tick};

use crate::{Inbox, RoleSet, Signal, SignalError, SignalKind, SignalResult, subscribers};

// ── BusConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusConfig {
    /// Queue capacity applied to every kind without an override.
    pub capacity: usize,

    /// Per-kind capacity overrides.
    pub kind_capacity: BTreeMap<SignalKind, usize>,

    /// Smoothing factor of `queue_avg`, in `(0, 1]`.  Larger reacts faster.
    pub ema_alpha: f32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { capacity: 64, kind_capacity: BTreeMap::new(), ema_alpha: 0.1 }
    }
}

impl BusConfig {
    pub fn capacity_of(&self, kind: SignalKind) -> usize {
        self.kind_capacity.get(&kind).copied().unwrap_or(self.capacity)
    }

    pub fn validate(&self) -> SignalResult<()> {
        for kind in SignalKind::ALL {
            if self.capacity_of(kind) == 0 {
                return Err(SignalError::Config(format!("{kind} queue capacity must be at least 1")));
            }
        }
        if !(self.ema_alpha > 0.0 && self.ema_alpha <= 1.0) {
            return Err(SignalError::Config(format!(
                "ema_alpha must be in (0, 1], got {}",
                self.ema_alpha
            )));
        }
        Ok(())
    }
}

// ── BusStats ──────────────────────────────────────────────────────────────────

/// Snapshot of bus statistics, taken once per tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BusStats {
    /// Queued signals per kind.
    pub occupancy: BTreeMap<SignalKind, usize>,
    /// Sum of `occupancy`.
    pub total: usize,
    /// Exponentially smoothed `total`.
    pub queue_avg: f32,
    /// Cumulative capacity evictions per kind.
    pub evicted: BTreeMap<SignalKind, u64>,
    /// Cumulative per-agent inbox overflow per kind.
    pub inbox_dropped: BTreeMap<SignalKind, u64>,
}

impl BusStats {
    /// Evictions plus inbox drops, per kind.
    pub fn dropped(&self) -> BTreeMap<SignalKind, u64> {
        SignalKind::ALL
            .into_iter()
            .map(|k| {
                let e = self.evicted.get(&k).copied().unwrap_or(0);
                let d = self.inbox_dropped.get(&k).copied().unwrap_or(0);
                (k, e + d)
            })
            .collect()
    }
}

// ── SignalBus ─────────────────────────────────────────────────────────────────

struct Entry {
    signal: Signal,
    pending: RoleSet,
}

pub struct SignalBus {
    config: BusConfig,
    queues: [VecDeque<Entry>; SignalKind::COUNT],
    capacity: [usize; SignalKind::COUNT],
    next_seq: u64,
    evicted: [u64; SignalKind::COUNT],
    inbox_dropped: [u64; SignalKind::COUNT],
    queue_avg: f32,
}

impl SignalBus {
    pub fn new(config: BusConfig) -> SignalResult<Self> {
        config.validate()?;
        let capacity = SignalKind::ALL.map(|k| config.capacity_of(k));
        Ok(Self {
            queues: std::array::from_fn(|i| VecDeque::with_capacity(capacity[i])),
            capacity,
            config,
            next_seq: 1,
            evicted: [0; SignalKind::COUNT],
            inbox_dropped: [0; SignalKind::COUNT],
            queue_avg: 0.0,
        })
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    // ── Emission ──────────────────────────────────────────────────────────

    /// Append `signal` to its kind's queue and return the assigned sequence
    /// number.  A full queue evicts its oldest entry first.
    pub fn emit(&mut self, mut signal: Signal) -> SignalResult<u64> {
        let kind = signal.kind;
        if !(signal.origin.is_finite() && signal.radius.is_finite()) {
            return Err(SignalError::NonFinite { kind });
        }
        if signal.ttl == 0 {
            return Err(SignalError::ZeroTtl { kind });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        signal.seq = seq;

        let i = kind.index();
        let queue = &mut self.queues[i];
        while queue.len() >= self.capacity[i] {
            if let Some(old) = queue.pop_front() {
                self.evicted[i] += 1;
                trace!(%kind, evicted_seq = old.signal.seq, "signal queue full, evicting oldest");
            }
        }
        queue.push_back(Entry { signal, pending: subscribers(kind) });
        Ok(seq)
    }

    // ── Delivery ──────────────────────────────────────────────────────────

    /// Remove and return, in emission order, every signal still pending for
    /// `role`.
    pub fn drain(&mut self, role: Role) -> Vec<Signal> {
        let mut out = Vec::new();
        for queue in &mut self.queues {
            for entry in queue.iter_mut() {
                if entry.pending.contains(role) {
                    entry.pending.remove(role);
                    out.push(entry.signal.clone());
                }
            }
            queue.retain(|e| !e.pending.is_empty());
        }
        out.sort_by_key(|s| s.seq);
        out
    }

    /// Drop every signal with `emitted_at + ttl ≤ now`.  Returns the number
    /// purged.
    pub fn purge_expired(&mut self, now: Tick) -> usize {
        let mut purged = 0;
        for queue in &mut self.queues {
            let before = queue.len();
            queue.retain(|e| !e.signal.is_expired(now));
            purged += before - queue.len();
        }
        purged
    }

    /// Add an agent's inbox overflow to the per-kind drop counters.
    pub fn record_inbox_drops(&mut self, inbox: &Inbox) {
        for kind in SignalKind::ALL {
            self.inbox_dropped[kind.index()] += u64::from(inbox.dropped(kind));
        }
    }

    // ── Inspection ────────────────────────────────────────────────────────

    #[inline]
    pub fn len(&self, kind: SignalKind) -> usize {
        self.queues[kind.index()].len()
    }

    pub fn total_len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    pub fn capacity(&self, kind: SignalKind) -> usize {
        self.capacity[kind.index()]
    }

    /// Queued signals of `kind`, oldest first.
    pub fn iter(&self, kind: SignalKind) -> impl Iterator<Item = &Signal> {
        self.queues[kind.index()].iter().map(|e| &e.signal)
    }

    pub fn evicted(&self, kind: SignalKind) -> u64 {
        self.evicted[kind.index()]
    }

    pub fn queue_avg(&self) -> f32 {
        self.queue_avg
    }

    // ── Statistics ────────────────────────────────────────────────────────

    /// Fold the current occupancy into `queue_avg` and return a snapshot.
    /// Call once per executed tick.
    pub fn sample(&mut self) -> BusStats {
        let total = self.total_len();
        self.queue_avg += self.config.ema_alpha * (total as f32 - self.queue_avg);
        self.stats()
    }

    /// Snapshot without touching `queue_avg`.
    pub fn stats(&self) -> BusStats {
        let per_kind = |arr: &[u64; SignalKind::COUNT]| -> BTreeMap<SignalKind, u64> {
            SignalKind::ALL.into_iter().map(|k| (k, arr[k.index()])).collect()
        };
        BusStats {
            occupancy: SignalKind::ALL.into_iter().map(|k| (k, self.len(k))).collect(),
            total: self.total_len(),
            queue_avg: self.queue_avg,
            evicted: per_kind(&self.evicted),
            inbox_dropped: per_kind(&self.inbox_dropped),
        }
    }
}
