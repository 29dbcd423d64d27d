//! `hive-sim` — the colony scheduler.
//!
//! # Tick loop
//!
//! ```text
//! every tick:
//!   ⓪ Commands — drain the command queue, apply each in FIFO order.
//!                Paused: republish the View and stop here.
//!   ① Signals  — purge expired signals; drain one inbox per present role.
//!   ② Agents   — Agent::update for each bee in ascending AgentId order.
//!   ③ Movement — apply displacement, clamp into bounds.
//!   ④ Economy  — receivers process the backlog; enqueue deliveries;
//!                step the weather.
//!   ⑤ Publish  — sample bus stats, advance the clock, publish Arc<View>.
//! ```
//!
//! # Modules
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | `sim`      | [`Simulation`]: state, population, tick loop            |
//! | `builder`  | [`SimBuilder`]: seeded construction                     |
//! | `command`  | [`Command`], validation, bounded command queue          |
//! | `view`     | [`View`] and its projections                            |
//! | `observer` | [`SimObserver`] hooks and [`TickReport`]                |
//! | `settings` | [`SimSettings`]: JSON-loadable run configuration        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hive_sim::{Command, NoopObserver, SimBuilder, SimSettings};
//!
//! let mut sim = SimBuilder::new(SimSettings::default()).default_colony().build()?;
//! let commands = sim.command_sender();
//! commands.submit(Command::Speed { value: 2.0 })?;
//! sim.run_ticks(600, &mut NoopObserver);
//! println!("{}", sim.latest_view().world.total_deposited);
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod observer;
pub mod settings;
pub mod sim;
pub mod view;


pub use builder::SimBuilder;
pub use command::{Command, CommandError, CommandSender, ParamKey, WeatherOp};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickReport};
pub use settings::SimSettings;
pub use sim::Simulation;
pub use view::{BeeView, FlowerView, HiveView, StatsView, View, WeatherView, WorldView};
