//! Bee kinds and colony roles.
//!
//! `kind` is fixed at creation; `role` may change over an agent's life
//! (forager ↔ receiver).  Only workers take worker roles; queens and drones
//! each have exactly one role named after the kind.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

// ── BeeKind ───────────────────────────────────────────────────────────────────

/// The caste of a bee.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BeeKind {
    #[default]
    Worker,
    Queen,
    Drone,
}

impl BeeKind {
    pub const ALL: [BeeKind; 3] = [BeeKind::Worker, BeeKind::Queen, BeeKind::Drone];

    pub fn name(self) -> &'static str {
        match self {
            BeeKind::Worker => "worker",
            BeeKind::Queen => "queen",
            BeeKind::Drone => "drone",
        }
    }

    /// The role a freshly created bee of this kind starts in.
    pub fn default_role(self) -> Role {
        match self {
            BeeKind::Worker => Role::Forager,
            BeeKind::Queen => Role::Queen,
            BeeKind::Drone => Role::Drone,
        }
    }

    /// Movement speed range `(min, max)` in world units per second.
    pub fn speed_range(self) -> (f32, f32) {
        match self {
            BeeKind::Worker => (40.0, 120.0),
            BeeKind::Queen => (10.0, 40.0),
            BeeKind::Drone => (60.0, 160.0),
        }
    }

    /// Maximum heading change per random-walk step, in radians.
    pub fn turn_noise(self) -> f32 {
        match self {
            BeeKind::Worker => 0.5,
            BeeKind::Queen => 0.2,
            BeeKind::Drone => 0.35,
        }
    }

    /// Check that `role` may be held by a bee of this kind.
    pub fn check_role(self, role: Role) -> CoreResult<()> {
        let ok = match self {
            BeeKind::Worker => role.is_worker_role(),
            BeeKind::Queen => role == Role::Queen,
            BeeKind::Drone => role == Role::Drone,
        };
        if ok {
            Ok(())
        } else {
            Err(CoreError::RoleMismatch { kind: self.name(), role: role.name() })
        }
    }
}

impl fmt::Display for BeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BeeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "worker" => Ok(BeeKind::Worker),
            "queen" => Ok(BeeKind::Queen),
            "drone" => Ok(BeeKind::Drone),
            other => Err(CoreError::UnknownKind(other.to_owned())),
        }
    }
}

// ── Role ──────────────────────────────────────────────────────────────────────

/// The job a bee currently performs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    Forager,
    Receiver,
    Nurse,
    Fanner,
    Queen,
    Drone,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Forager,
        Role::Receiver,
        Role::Nurse,
        Role::Fanner,
        Role::Queen,
        Role::Drone,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Forager => "forager",
            Role::Receiver => "receiver",
            Role::Nurse => "nurse",
            Role::Fanner => "fanner",
            Role::Queen => "queen",
            Role::Drone => "drone",
        }
    }

    #[inline]
    pub fn is_worker_role(self) -> bool {
        matches!(self, Role::Forager | Role::Receiver | Role::Nurse | Role::Fanner)
    }

    /// Dense index in `0..Role::ALL.len()`, for per-role arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Role::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| CoreError::UnknownRole(s.to_owned()))
    }
}
