//! External commands and the bounded queue that carries them to the
//! scheduler.
//!
//! Producers hold a cloneable [`CommandSender`]; the [`Simulation`] owns the
//! single receiver and drains it with `try_recv` at the start of every tick.
//! Validation happens on the producer side, so a rejected command never
//! reaches the queue.
//!
//! [`Simulation`]: crate::Simulation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use hive_core::{BeeKind, CoreError, Role};
use hive_world::{WeatherMode, WorldError};

/// Largest `count` accepted by `add_bees` and `add_flowers`.
pub const MAX_SPAWN: usize = 500;

/// Largest `n` accepted by `add_flower_at`.
pub const MAX_CLUSTER: usize = 50;

/// Upper bound of the speed multiplier.
pub const MAX_SPEED: f32 = 4.0;

// ── CommandError ──────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown parameter: {0}")]
    UnknownParam(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("{what} must be in 1..={max}, got {got}")]
    InvalidCount { what: &'static str, got: i64, max: usize },

    #[error("invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: f64 },

    #[error("malformed command: {0}")]
    Malformed(String),

    #[error("command queue full")]
    QueueFull,

    #[error("command queue closed")]
    QueueClosed,
}

// ── ParamKey ──────────────────────────────────────────────────────────────────

/// Agent tunables adjustable at runtime through `set_param`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    ReceiverRate,
    TrembleThreshold,
}

impl ParamKey {
    pub fn name(self) -> &'static str {
        match self {
            ParamKey::ReceiverRate => "receiver_rate",
            ParamKey::TrembleThreshold => "tremble_threshold",
        }
    }

    /// Reject values outside the key's domain.
    pub fn check(self, value: f32) -> Result<(), CommandError> {
        let ok = match self {
            ParamKey::ReceiverRate => value.is_finite() && value >= 0.0,
            ParamKey::TrembleThreshold => (0.0..=1.0).contains(&value),
        };
        if ok {
            Ok(())
        } else {
            Err(CommandError::InvalidValue { what: self.name(), value: f64::from(value) })
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, CommandError> {
        match s {
            "receiver_rate" => Ok(ParamKey::ReceiverRate),
            "tremble_threshold" => Ok(ParamKey::TrembleThreshold),
            other => Err(CommandError::UnknownParam(other.to_owned())),
        }
    }
}

// ── WeatherOp ─────────────────────────────────────────────────────────────────

/// One weather control.  Serializes as `{"op": ..., "value": ...}`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum WeatherOp {
    Mode(WeatherMode),
    /// Manual nectar flow; clamped into `[0, 1]` on apply.
    Flow(f32),
    Rain(bool),
}

// ── Command ───────────────────────────────────────────────────────────────────

/// One mutation requested from outside the scheduler.
///
/// Serializes with an `action` tag, matching the wire names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    Toggle,
    Play,
    Pause,
    Speed { value: f32 },
    AddBees { count: usize, kind: BeeKind, role: Option<Role> },
    AddFlowers { count: usize },
    AddFlowerAt { x: f32, y: f32, n: usize, capacity: Option<f32> },
    SetParam { key: ParamKey, value: f32 },
    Weather(WeatherOp),
}

impl Command {
    pub fn action(&self) -> &'static str {
        match self {
            Command::Toggle => "toggle",
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Speed { .. } => "speed",
            Command::AddBees { .. } => "add_bees",
            Command::AddFlowers { .. } => "add_flowers",
            Command::AddFlowerAt { .. } => "add_flower_at",
            Command::SetParam { .. } => "set_param",
            Command::Weather(_) => "weather",
        }
    }

    /// Check every argument against its domain.  Speed values outside
    /// `[0, MAX_SPEED]` are clamped on apply rather than rejected.
    pub fn validate(&self) -> Result<(), CommandError> {
        match *self {
            Command::Toggle | Command::Play | Command::Pause => Ok(()),
            Command::Speed { value } => {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(CommandError::InvalidValue { what: "speed", value: f64::from(value) })
                }
            }
            Command::AddBees { count, kind, role } => {
                check_count("count", count, MAX_SPAWN)?;
                kind.check_role(role.unwrap_or(kind.default_role()))?;
                Ok(())
            }
            Command::AddFlowers { count } => check_count("count", count, MAX_SPAWN),
            Command::AddFlowerAt { x, y, n, capacity } => {
                check_count("n", n, MAX_CLUSTER)?;
                for (what, v) in [("x", x), ("y", y)] {
                    if !v.is_finite() {
                        return Err(CommandError::InvalidValue { what, value: f64::from(v) });
                    }
                }
                match capacity {
                    Some(c) if !(c.is_finite() && c > 0.0) => {
                        Err(CommandError::InvalidValue { what: "capacity", value: f64::from(c) })
                    }
                    _ => Ok(()),
                }
            }
            Command::SetParam { key, value } => key.check(value),
            Command::Weather(WeatherOp::Flow(flow)) if !flow.is_finite() => {
                Err(CommandError::InvalidValue { what: "flow", value: f64::from(flow) })
            }
            Command::Weather(_) => Ok(()),
        }
    }
}

fn check_count(what: &'static str, got: usize, max: usize) -> Result<(), CommandError> {
    if (1..=max).contains(&got) {
        Ok(())
    } else {
        Err(CommandError::InvalidCount { what, got: i64::try_from(got).unwrap_or(i64::MAX), max })
    }
}

// ── Queue ─────────────────────────────────────────────────────────────────────

/// Producer half of the command queue.  Cheap to clone; one per connection.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: mpsc::Sender<Command>,
}

pub type CommandReceiver = mpsc::Receiver<Command>;

/// Create a bounded command queue.
pub fn command_channel(capacity: usize) -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (CommandSender { tx }, rx)
}

impl CommandSender {
    /// Validate `command` and append it to the queue without blocking.
    pub fn submit(&self, command: Command) -> Result<(), CommandError> {
        command.validate()?;
        match self.tx.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(cmd)) => {
                warn!(?cmd, "command queue full; dropping command");
                Err(CommandError::QueueFull)
            }
            Err(TrySendError::Closed(cmd)) => {
                warn!(?cmd, "command queue closed");
                Err(CommandError::QueueClosed)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
