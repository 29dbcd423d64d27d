//! Colony-wide behavior parameters and per-agent tunables.

use hive_signal::SignalKind;

use crate::{AgentError, AgentResult};

/// Parameters that may differ between individual bees.  Changed at run time
/// by the `set_param` command.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tunables {
    /// Receiver-queue processing rate, nectar units per second.
    pub receiver_rate: f32,
    /// A load must be of strictly higher quality than this to be advertised
    /// with a waggle dance.
    pub tremble_threshold: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self { receiver_rate: 1.2, tremble_threshold: 0.3 }
    }
}

/// Colony-wide behavior constants.  Durations are simulated seconds; signal
/// lifetimes are ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColonyParams {
    // ── Foraging ──────────────────────────────────────────────────────────
    /// How far a searching forager perceives flowers directly.
    pub sensing_radius: f32,
    /// Nectar a forager carries home per trip.
    pub forager_capacity: f32,
    /// Nectar taken from a flower per second of foraging.
    pub forage_rate: f32,
    /// Distance at which a bee counts as having reached its target.
    pub arrive_radius: f32,
    /// Receiver backlog at or above which an unloading forager trembles.
    pub congestion_threshold: f32,

    // ── Recruitment ───────────────────────────────────────────────────────
    /// Dance duration per unit of load quality.
    pub recruit_secs_per_quality: f32,
    /// Seconds between waggle circuits while recruiting.
    pub waggle_interval_secs: f32,

    // ── Role allocation ───────────────────────────────────────────────────
    /// Probability that a searching forager feeling a tremble becomes a
    /// receiver.
    pub tremble_switch_prob: f32,
    /// A receiver idle this long goes back to foraging.
    pub receiver_idle_secs: f32,
    /// Minimum time in a role before a signal-driven role switch.
    pub role_min_dwell_secs: f32,

    // ── In-hive roles ─────────────────────────────────────────────────────
    pub nurse_tend_secs: f32,
    pub nurse_rest_secs: f32,
    pub fanning_secs: f32,
    /// Period of the queen's mandibular pheromone pulses.
    pub queen_period_secs: f32,

    // ── Signals ───────────────────────────────────────────────────────────
    pub waggle_range: f32,
    pub tremble_range: f32,
    pub fanning_range: f32,
    pub waggle_ttl: u32,
    pub tremble_ttl: u32,
    pub queen_ttl: u32,
    pub nasonov_ttl: u32,
    pub fanning_ttl: u32,
    /// Per-kind cap on the signals one agent perceives per tick.
    pub inbox_capacity: usize,
    /// How long the emission hint stays lit.
    pub flash_secs: f32,

    // ── Movement ──────────────────────────────────────────────────────────
    /// Fraction of a kind's mid speed used when flying to a target.
    pub cruise_scale: f32,
    /// Fraction of a random speed draw used when wandering.
    pub wander_scale: f32,

    /// Tunables given to newly created bees.
    pub tunables: Tunables,
}

impl Default for ColonyParams {
    fn default() -> Self {
        Self {
            sensing_radius:           90.0,
            forager_capacity:         1.0,
            forage_rate:              0.5,
            arrive_radius:            6.0,
            congestion_threshold:     3.0,
            recruit_secs_per_quality: 4.0,
            waggle_interval_secs:     0.75,
            tremble_switch_prob:      0.3,
            receiver_idle_secs:       20.0,
            role_min_dwell_secs:      3.0,
            nurse_tend_secs:          6.0,
            nurse_rest_secs:          4.0,
            fanning_secs:             3.0,
            queen_period_secs:        2.0,
            waggle_range:             60.0,
            tremble_range:            60.0,
            fanning_range:            40.0,
            waggle_ttl:               180,
            tremble_ttl:              120,
            queen_ttl:                240,
            nasonov_ttl:              180,
            fanning_ttl:              90,
            inbox_capacity:           8,
            flash_secs:               0.6,
            cruise_scale:             0.6,
            wander_scale:             0.5,
            tunables:                 Tunables::default(),
        }
    }
}

impl ColonyParams {
    /// Perception radius of a local signal kind (0 for colony-wide kinds).
    pub fn range_of(&self, kind: SignalKind) -> f32 {
        match kind {
            SignalKind::Waggle => self.waggle_range,
            SignalKind::Tremble => self.tremble_range,
            SignalKind::Fanning => self.fanning_range,
            SignalKind::QueenMandibular | SignalKind::Nasonov => 0.0,
        }
    }

    pub fn ttl_of(&self, kind: SignalKind) -> u32 {
        match kind {
            SignalKind::Waggle => self.waggle_ttl,
            SignalKind::Tremble => self.tremble_ttl,
            SignalKind::QueenMandibular => self.queen_ttl,
            SignalKind::Nasonov => self.nasonov_ttl,
            SignalKind::Fanning => self.fanning_ttl,
        }
    }

    pub fn validate(&self) -> AgentResult<()> {
        let non_negative = [
            ("sensing_radius", self.sensing_radius),
            ("arrive_radius", self.arrive_radius),
            ("congestion_threshold", self.congestion_threshold),
            ("recruit_secs_per_quality", self.recruit_secs_per_quality),
            ("receiver_idle_secs", self.receiver_idle_secs),
            ("role_min_dwell_secs", self.role_min_dwell_secs),
            ("nurse_tend_secs", self.nurse_tend_secs),
            ("nurse_rest_secs", self.nurse_rest_secs),
            ("fanning_secs", self.fanning_secs),
            ("waggle_range", self.waggle_range),
            ("tremble_range", self.tremble_range),
            ("fanning_range", self.fanning_range),
            ("flash_secs", self.flash_secs),
            ("cruise_scale", self.cruise_scale),
            ("wander_scale", self.wander_scale),
            ("receiver_rate", self.tunables.receiver_rate),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(AgentError::Params(format!("{name} must be finite and >= 0, got {v}")));
            }
        }
        let positive = [
            ("forager_capacity", self.forager_capacity),
            ("forage_rate", self.forage_rate),
            ("waggle_interval_secs", self.waggle_interval_secs),
            ("queen_period_secs", self.queen_period_secs),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(AgentError::Params(format!("{name} must be > 0, got {v}")));
            }
        }
        for (name, p) in [
            ("tremble_switch_prob", self.tremble_switch_prob),
            ("tremble_threshold", self.tunables.tremble_threshold),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(AgentError::Params(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if SignalKind::ALL.into_iter().any(|k| self.ttl_of(k) == 0) {
            return Err(AgentError::Params("signal ttls must be at least 1 tick".into()));
        }
        if self.inbox_capacity == 0 {
            return Err(AgentError::Params("inbox_capacity must be at least 1".into()));
        }
        Ok(())
    }
}
