//! `hive-bridge` — connects external clients to a running colony.
//!
//! ```text
//!  client ──text──▶ Session ──Command──▶ CommandSender ──▶ Simulation (driver task)
//!                      │                                        │
//!                      └─subscribe─▶ FanOut ◀──watch<Arc<View>>─┘
//!                                      │
//!  client ◀──view frames @ hz── FrameSink
//! ```
//!
//! | Module     | Contents                                              |
//! |------------|-------------------------------------------------------|
//! | `protocol` | client message parsing, server frame encoding         |
//! | `sink`     | [`FrameSink`]: non-blocking outbound frame channel    |
//! | `fanout`   | [`FanOut`]: one republishing task per subscriber      |
//! | `session`  | [`Session`]: per-connection message routing           |
//! | `driver`   | [`SimDriver`]: ticks a `Simulation` on a tokio task   |
//!
//! The transport itself (WebSocket, TCP, …) is left to the embedding
//! program: it feeds incoming text to [`Session::handle_text`] and forwards
//! whatever arrives on its [`FrameSink`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let handle = SimDriver::spawn(SimBuilder::new(settings).default_colony().build()?);
//! let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(16);
//! let session = handle.connect(Arc::new(tx));
//! session.handle_text(r#"{"type":"subscribe","stream":"view","hz":20}"#);
//! while let Some(frame) = rx.recv().await { socket.send(frame).await?; }
//! ```

pub mod driver;
pub mod error;
pub mod fanout;
pub mod protocol;
pub mod session;
pub mod sink;

#[cfg(test)]
mod tests;

pub use driver::{DriverHandle, SimDriver};
pub use error::{BridgeError, BridgeResult};
pub use fanout::{FanOut, SessionId};
pub use protocol::{ClientMessage, ServerMessage, parse_client};
pub use session::Session;
pub use sink::{FrameSink, SinkError};
