//! Outbound frame sinks.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    /// The consumer has not caught up; the frame was not delivered.
    #[error("sink full")]
    Full,

    #[error("sink closed")]
    Closed,
}

/// Where a connection's outbound frames go.  Implementations must never
/// block: a consumer that cannot take a frame right now loses it.
pub trait FrameSink: Send + Sync + 'static {
    fn try_send(&self, frame: String) -> Result<(), SinkError>;
}

impl FrameSink for mpsc::Sender<String> {
    fn try_send(&self, frame: String) -> Result<(), SinkError> {
        mpsc::Sender::try_send(self, frame).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Closed,
        })
    }
}
