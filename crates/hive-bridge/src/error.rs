//! Bridge-layer error types.

use hive_sim::CommandError;

/// Errors raised while handling a client message or running the driver.
///
/// Every variant that stems from client input is reported back to that
/// client as an `error` frame; none of them reach the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The message was not valid JSON, or a frame failed to encode.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unknown message type: {0}")]
    UnknownType(String),

    #[error("unknown stream: {0}")]
    UnknownStream(String),

    /// The command was rejected by validation or the queue.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The driver task panicked or was cancelled.
    #[error("driver task failed: {0}")]
    Driver(#[from] tokio::task::JoinError),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
