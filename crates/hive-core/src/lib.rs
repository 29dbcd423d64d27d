//! `hive-core`: the vocabulary shared by every `hive-*` crate.
//!
//! Ids, geometry, time, seeded randomness and the bee kind/role enums.
//! Depends on `rand` and `thiserror` only, plus `serde` behind a feature.
//!
//! # Modules
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `FlowerId`                                 |
//! | [`geom`]        | `Vec2`, `Bounds`                                      |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (one per bee), `SimRng` (placement)        |
//! | [`role`]        | `BeeKind`, `Role`                                     |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;
pub mod role;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geom::{Bounds, Vec2};
pub use ids::{AgentId, FlowerId};
pub use rng::{AgentRng, SimRng};
pub use role::{BeeKind, Role};
pub use time::{SimClock, SimConfig, Tick};
