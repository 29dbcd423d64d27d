use thiserror::Error;

use hive_agent::AgentError;
use hive_core::CoreError;
use hive_signal::SignalError;
use hive_world::WorldError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Signal(#[from] SignalError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
