//! World error type.

use thiserror::Error;

use hive_core::FlowerId;

/// Errors produced by `hive-world`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    #[error("flower {0} not found in world")]
    UnknownFlower(FlowerId),

    #[error("invalid nectar amount: {0}")]
    InvalidAmount(f32),

    #[error("invalid position: ({x}, {y})")]
    InvalidPosition { x: f32, y: f32 },
}

pub type WorldResult<T> = Result<T, WorldError>;
