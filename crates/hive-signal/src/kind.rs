//! Signal kinds, delivery scope, and the role subscription table.

use std::fmt;

use hive_core::Role;

/// The five communication channels of the colony.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SignalKind {
    /// Recruitment dance naming a flower and its quality.
    Waggle,
    /// Unloading congestion: more nectar than receivers can process.
    Tremble,
    /// Queen presence pheromone.
    QueenMandibular,
    /// Orientation pheromone released by a scout at a new flower.
    Nasonov,
    /// Wing-fanning that spreads scent through the hive.
    Fanning,
}

impl SignalKind {
    pub const COUNT: usize = 5;

    pub const ALL: [SignalKind; Self::COUNT] = [
        SignalKind::Waggle,
        SignalKind::Tremble,
        SignalKind::QueenMandibular,
        SignalKind::Nasonov,
        SignalKind::Fanning,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalKind::Waggle => "waggle",
            SignalKind::Tremble => "tremble",
            SignalKind::QueenMandibular => "queen_mandibular",
            SignalKind::Nasonov => "nasonov",
            SignalKind::Fanning => "fanning",
        }
    }

    /// Pheromones permeate the whole colony; dances and fanning are only
    /// perceived by bees within the signal's radius.
    pub fn scope(self) -> Scope {
        match self {
            SignalKind::QueenMandibular | SignalKind::Nasonov => Scope::Colony,
            SignalKind::Waggle | SignalKind::Tremble | SignalKind::Fanning => Scope::Local,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who can perceive a signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Every subscriber, regardless of position.
    Colony,
    /// Subscribers within `Signal::radius` of `Signal::origin`.
    Local,
}

// ── RoleSet ───────────────────────────────────────────────────────────────────

/// A small bitset over [`Role`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const EMPTY: RoleSet = RoleSet(0);

    pub fn of(roles: &[Role]) -> Self {
        let mut s = Self::EMPTY;
        for &r in roles {
            s.insert(r);
        }
        s
    }

    #[inline]
    pub fn insert(&mut self, role: Role) {
        self.0 |= 1 << role.index();
    }

    #[inline]
    pub fn remove(&mut self, role: Role) {
        self.0 &= !(1 << role.index());
    }

    #[inline]
    pub fn contains(self, role: Role) -> bool {
        self.0 & (1 << role.index()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }
}

// ── Subscription table ────────────────────────────────────────────────────────

/// The kinds a role listens to.
pub fn subscriptions(role: Role) -> &'static [SignalKind] {
    use SignalKind::*;
    match role {
        Role::Forager => &[Waggle, Tremble, QueenMandibular],
        Role::Receiver => &[Tremble, QueenMandibular],
        Role::Nurse => &[QueenMandibular],
        Role::Fanner => &[Nasonov, Fanning, QueenMandibular],
        Role::Queen => &[],
        Role::Drone => &[QueenMandibular],
    }
}

/// The roles that must drain a signal of `kind` before it leaves its queue.
pub fn subscribers(kind: SignalKind) -> RoleSet {
    let mut set = RoleSet::EMPTY;
    for role in Role::ALL {
        if subscriptions(role).contains(&kind) {
            set.insert(role);
        }
    }
    set
}
