use thiserror::Error;

use hive_core::{AgentId, CoreError};
use hive_signal::SignalError;
use hive_world::WorldError;

/// Errors raised while updating a single agent.
///
/// The scheduler treats these as invariant violations local to the agent:
/// it logs them and carries on with the rest of the colony.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {agent}: {source}")]
    World { agent: AgentId, source: WorldError },

    #[error("agent {agent}: {source}")]
    Signal { agent: AgentId, source: SignalError },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("colony parameter error: {0}")]
    Params(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
