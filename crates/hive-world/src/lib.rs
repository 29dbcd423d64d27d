//! `hive-world` — the physical world the colony lives in.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`flower`] | `Flower`, `WorldConfig`                                      |
//! | [`hive`]   | `Hive` geometry and receiver queue                           |
//! | [`weather`]| `Weather`: time of day, nectar flow, foraging window         |
//! | [`world`]  | `World` (flowers + R-tree index + nectar economy)            |
//! | [`error`]  | `WorldError`, `WorldResult<T>`                               |
//!
//! # Nectar economy
//!
//! ```text
//! flower.remaining ──consume_flower──▶ forager.carrying
//!                                          │ unload
//!                                          ▼
//!                               hive.receiver_queue ──receive──▶ total_deposited
//! ```
//!
//! Every arrow only moves nectar forward: `remaining` never grows and
//! `total_deposited` never shrinks.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod flower;
pub mod hive;
pub mod weather;
pub mod world;

#[cfg(test)]
mod tests;

pub use error::{WorldError, WorldResult};
pub use flower::{Flower, WorldConfig};
pub use hive::Hive;
pub use weather::{Weather, WeatherConfig, WeatherMode};
pub use world::World;

/// Amounts below this are treated as zero nectar.
pub const NECTAR_EPS: f32 = 1e-6;
