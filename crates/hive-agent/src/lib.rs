//! `hive-agent` — bees and their role state machines.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`state`]   | `BehaviorState`, `FlowerTarget`                                 |
//! | [`event`]   | `Event`, `Action`, `Emission`, `Transition`                     |
//! | [`machine`] | `transition` — per-role tables of pure transition functions     |
//! | [`context`] | `AgentContext<'a>` — what one agent may touch during its update |
//! | [`agent`]   | `Agent`, `StepOutcome` — perceive / decide / act / steer        |
//! | [`params`]  | `ColonyParams`, `Tunables`                                      |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                                  |
//!
//! # Per-tick agent update
//!
//! 1. **Gather**: filter the role inbox down to in-scope signals (`Inbox`).
//! 2. **Perceive**: advance timers, do the continuous work of the current
//!    state (take nectar, unload, process the queue) and derive one `Event`.
//! 3. **Decide**: pure `transition(role, &state, &event, rules)`.
//! 4. **Act**: apply the `Action` (emit a signal, switch role).
//! 5. **Steer**: set `heading`/`speed` for the scheduler's movement phase.
//!
//! Behavior is selected by `role`, never by type.  Adding a role means adding
//! one transition function to the table in [`machine`].

pub mod agent;
pub mod context;
pub mod error;
pub mod event;
pub mod machine;
pub mod params;
pub mod state;


pub use agent::{Agent, StepOutcome};
pub use context::AgentContext;
pub use error::{AgentError, AgentResult};
pub use event::{Action, Emission, Event, Transition};
pub use machine::{Rules, transition};
pub use params::{ColonyParams, Tunables};
pub use state::{BehaviorState, FlowerTarget};
