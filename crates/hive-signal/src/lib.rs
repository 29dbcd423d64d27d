//! `hive-signal` — stigmergic communication between bees.
//!
//! # Model
//!
//! Bees never address each other.  They `emit` signals onto the shared
//! [`SignalBus`]; each role subscribes to a fixed set of kinds, and once per
//! tick the scheduler `drain`s one role inbox per present role.  Every agent
//! of that role then filters the role inbox down to what it can actually
//! perceive with [`Inbox::gather`].
//!
//! ```text
//! emit ─▶ [kind queue, bounded FIFO] ─▶ drain(role) ─▶ Inbox::gather(pos) ─▶ agent
//!              │ at capacity: evict oldest (counted)
//!              │ emitted_at + ttl ≤ now: purged
//! ```
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`kind`]   | `SignalKind`, `Scope`, `RoleSet`, subscription table         |
//! | [`signal`] | `Signal`, `SignalPayload`                                    |
//! | [`bus`]    | `SignalBus`, `BusConfig`, `BusStats`                         |
//! | [`inbox`]  | `Inbox` (per-agent filtered view of a role inbox)            |
//! | [`error`]  | `SignalError`, `SignalResult<T>`                             |

pub mod bus;
pub mod error;
pub mod inbox;
pub mod kind;
pub mod signal;

#[cfg(test)]
mod tests;

pub use bus::{BusConfig, BusStats, SignalBus};
pub use error::{SignalError, SignalResult};
pub use inbox::Inbox;
pub use kind::{RoleSet, Scope, SignalKind, subscribers, subscriptions};
pub use signal::{Signal, SignalPayload};
