//! Wire protocol: JSON text messages.
//!
//! # Client → bridge
//!
//! ```json
//! { "type": "cmd", "action": "add_bees", "count": 5, "kind": "worker", "role": "receiver" }
//! { "type": "subscribe", "stream": "view", "hz": 30 }
//! { "type": "unsubscribe" }
//! ```
//!
//! | Action          | Parameters                                   |
//! |-----------------|----------------------------------------------|
//! | `toggle`        | none                                         |
//! | `play`          | none                                         |
//! | `pause`         | none                                         |
//! | `speed`         | `value`                                      |
//! | `add_bees`      | `count` = 1, `kind` = `"worker"`, `role`     |
//! | `add_flowers`   | `count` = 10                                 |
//! | `add_flower_at` | `x`, `y`, `n` = 1, `capacity`                |
//! | `set_param`     | `key`, `value`                               |
//! | `weather`       | `op`, `value` (see below)                    |
//!
//! Weather ops: `mode` takes `"auto"`/`"manual"` (default `"auto"`);
//! `flow` takes a number in `[0, 1]` or a word, `"good"`/`"high"` → 0.8 and
//! any other word → 0.2 (default 0.7); `rain` takes a bool (default `false`).
//!
//! # Bridge → client
//!
//! ```json
//! { "type": "view",  "payload": { ... } }
//! { "type": "ack",   "payload": { "action": "add_bees", ... } }
//! { "type": "error", "message": "unknown role: wizard" }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use hive_core::{BeeKind, Role};
use hive_sim::command::{MAX_CLUSTER, MAX_SPAWN};
use hive_sim::{Command, CommandError, ParamKey, View, WeatherOp};
use hive_world::WeatherMode;

use crate::{BridgeError, BridgeResult};

pub const DEFAULT_HZ: u32 = 30;
pub const MIN_HZ: u32 = 1;
pub const MAX_HZ: u32 = 120;

/// Default `count` of `add_flowers`.
pub const DEFAULT_FLOWER_COUNT: i64 = 10;

/// Default manual flow of the `weather` `flow` op.
pub const DEFAULT_WEATHER_FLOW: f32 = 0.7;

/// The only stream a client can subscribe to.
pub const VIEW_STREAM: &str = "view";

// ── Client messages ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ClientMessage {
    Cmd(Command),
    /// Subscribe to the View stream at `hz` frames per second (already
    /// clamped).
    Subscribe { hz: u32 },
    Unsubscribe,
}

/// Parse one client text message.
pub fn parse_client(text: &str) -> BridgeResult<ClientMessage> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(obj) = value else {
        return Err(BridgeError::Malformed("message must be a JSON object".into()));
    };
    match obj.get("type").and_then(Value::as_str) {
        Some("cmd") => Ok(ClientMessage::Cmd(parse_command(&obj)?)),
        Some("subscribe") => {
            let stream = obj.get("stream").and_then(Value::as_str).unwrap_or(VIEW_STREAM);
            if stream != VIEW_STREAM {
                return Err(BridgeError::UnknownStream(stream.to_owned()));
            }
            Ok(ClientMessage::Subscribe { hz: parse_hz(obj.get("hz"))? })
        }
        Some("unsubscribe") => Ok(ClientMessage::Unsubscribe),
        Some(other) => Err(BridgeError::UnknownType(other.to_owned())),
        None => Err(BridgeError::Malformed("missing \"type\"".into())),
    }
}

/// Missing → [`DEFAULT_HZ`]; integers are clamped into `MIN_HZ..=MAX_HZ`.
fn parse_hz(value: Option<&Value>) -> BridgeResult<u32> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_HZ),
        Some(v) => {
            let hz = v
                .as_i64()
                .ok_or_else(|| BridgeError::Malformed(format!("hz must be an integer, got {v}")))?;
            Ok(hz.clamp(i64::from(MIN_HZ), i64::from(MAX_HZ)) as u32)
        }
    }
}

/// Build a [`Command`] from the fields of a `cmd` message and validate it.
pub fn parse_command(obj: &Map<String, Value>) -> Result<Command, CommandError> {
    let action = obj
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| CommandError::Malformed("missing \"action\"".into()))?;

    let command = match action {
        "toggle" => Command::Toggle,
        "play" => Command::Play,
        "pause" => Command::Pause,
        "speed" => Command::Speed { value: required_num(obj, "value")? },
        "add_bees" => {
            let count = count(obj, "count", Some(1), MAX_SPAWN)?;
            let kind = match string(obj, "kind")? {
                Some(s) => s.parse::<BeeKind>()?,
                None => BeeKind::Worker,
            };
            let role = string(obj, "role")?.map(str::parse::<Role>).transpose()?;
            Command::AddBees { count, kind, role }
        }
        "add_flowers" => Command::AddFlowers { count: count(obj, "count", Some(DEFAULT_FLOWER_COUNT), MAX_SPAWN)? },
        "add_flower_at" => Command::AddFlowerAt {
            x:        required_num(obj, "x")?,
            y:        required_num(obj, "y")?,
            n:        count(obj, "n", Some(1), MAX_CLUSTER)?,
            capacity: num(obj, "capacity")?,
        },
        "set_param" => {
            let key = string(obj, "key")?
                .ok_or_else(|| CommandError::Malformed("missing \"key\"".into()))?
                .parse::<ParamKey>()?;
            Command::SetParam { key, value: required_num(obj, "value")? }
        }
        "weather" => Command::Weather(weather_op(obj)?),
        other => return Err(CommandError::UnknownAction(other.to_owned())),
    };
    command.validate()?;
    Ok(command)
}

fn weather_op(obj: &Map<String, Value>) -> Result<WeatherOp, CommandError> {
    let value = obj.get("value").filter(|v| !v.is_null());
    match obj.get("op").and_then(Value::as_str) {
        Some("mode") => {
            let mode = match string(obj, "value")? {
                Some(s) => s.parse::<WeatherMode>().map_err(CommandError::Malformed)?,
                None => WeatherMode::Auto,
            };
            Ok(WeatherOp::Mode(mode))
        }
        Some("flow") => {
            let flow = match value {
                None => DEFAULT_WEATHER_FLOW,
                Some(Value::String(word)) => match word.to_ascii_lowercase().as_str() {
                    "good" | "high" => 0.8,
                    _ => 0.2,
                },
                Some(v) => required_num(obj, "value").map_err(|_| {
                    CommandError::Malformed(format!("flow must be a number or a word, got {v}"))
                })?,
            };
            Ok(WeatherOp::Flow(flow))
        }
        Some("rain") => match value {
            None => Ok(WeatherOp::Rain(false)),
            Some(Value::Bool(rain)) => Ok(WeatherOp::Rain(*rain)),
            Some(v) => Err(CommandError::Malformed(format!("rain must be a bool, got {v}"))),
        },
        _ => Err(CommandError::Malformed("weather op must be one of: mode, flow, rain".into())),
    }
}

fn num(obj: &Map<String, Value>, key: &str) -> Result<Option<f32>, CommandError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(|f| Some(f as f32))
            .ok_or_else(|| CommandError::Malformed(format!("{key} must be a number, got {v}"))),
    }
}

fn required_num(obj: &Map<String, Value>, key: &str) -> Result<f32, CommandError> {
    num(obj, key)?.ok_or_else(|| CommandError::Malformed(format!("missing \"{key}\"")))
}

fn string<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, CommandError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(v) => Err(CommandError::Malformed(format!("{key} must be a string, got {v}"))),
    }
}

fn count(
    obj: &Map<String, Value>,
    key: &'static str,
    default: Option<i64>,
    max: usize,
) -> Result<usize, CommandError> {
    let got = match obj.get(key) {
        None | Some(Value::Null) => {
            default.ok_or_else(|| CommandError::Malformed(format!("missing \"{key}\"")))?
        }
        Some(v) => v
            .as_i64()
            .ok_or_else(|| CommandError::Malformed(format!("{key} must be an integer, got {v}")))?,
    };
    match usize::try_from(got) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(CommandError::InvalidCount { what: key, got, max }),
    }
}

// ── Server messages ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    View { payload: &'a View },
    Ack { payload: Value },
    Error { message: String },
}

impl ServerMessage<'_> {
    pub fn to_json(&self) -> BridgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn error(err: &BridgeError) -> Self {
        ServerMessage::Error { message: err.to_string() }
    }
}

/// The `ack` payload for an accepted command: the command with its
/// defaults filled in.
pub fn ack_payload(command: &Command) -> BridgeResult<Value> {
    Ok(serde_json::to_value(command)?)
}
