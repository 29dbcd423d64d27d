//! Core error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `CoreError` via `From` impls or wrap `CoreError` as one variant.

use thiserror::Error;

/// The base error type for `hive-core` parsing and configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown bee kind: {0}")]
    UnknownKind(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("role {role} is not valid for a {kind}")]
    RoleMismatch { kind: &'static str, role: &'static str },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `hive-core`.
pub type CoreResult<T> = Result<T, CoreError>;
