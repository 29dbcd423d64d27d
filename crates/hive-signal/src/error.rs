//! Signal-bus error type.
//!
//! Queue overflow is deliberately absent: a full queue evicts its oldest
//! entry and counts the drop.

use thiserror::Error;

use crate::SignalKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    #[error("{kind} signal has a non-finite origin or radius")]
    NonFinite { kind: SignalKind },

    #[error("{kind} signal has zero ttl")]
    ZeroTtl { kind: SignalKind },

    #[error("bus configuration error: {0}")]
    Config(String),
}

pub type SignalResult<T> = Result<T, SignalError>;
