//! One client connection.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use hive_sim::CommandSender;

use crate::fanout::{FanOut, SessionId};
use crate::protocol::{ClientMessage, ServerMessage, VIEW_STREAM, ack_payload, parse_client};
use crate::{BridgeResult, FrameSink};

/// Routes a connection's messages to the command queue and the fan-out.
///
/// Dropping the session removes its View subscription.
pub struct Session<S: FrameSink> {
    id:       SessionId,
    sink:     Arc<S>,
    commands: CommandSender,
    fanout:   Arc<FanOut>,
}

impl<S: FrameSink> Session<S> {
    pub fn new(id: SessionId, sink: Arc<S>, commands: CommandSender, fanout: Arc<FanOut>) -> Self {
        Self { id, sink, commands, fanout }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Handle one client message and return the `ack` payload.
    pub fn handle(&self, text: &str) -> BridgeResult<Value> {
        match parse_client(text)? {
            ClientMessage::Cmd(command) => {
                let payload = ack_payload(&command)?;
                self.commands.submit(command)?;
                Ok(payload)
            }
            ClientMessage::Subscribe { hz } => {
                self.fanout.subscribe(self.id, Arc::clone(&self.sink), hz);
                Ok(json!({ "stream": VIEW_STREAM, "hz": hz }))
            }
            ClientMessage::Unsubscribe => {
                let was = self.fanout.unsubscribe(self.id);
                Ok(json!({ "stream": VIEW_STREAM, "unsubscribed": was }))
            }
        }
    }

    /// Handle one client message, send the `ack` or `error` reply to the
    /// sink, and return the reply frame.
    pub fn handle_text(&self, text: &str) -> String {
        let reply = match self.handle(text) {
            Ok(payload) => ServerMessage::Ack { payload }.to_json(),
            Err(e) => {
                debug!(session = self.id, error = %e, "client message rejected");
                ServerMessage::error(&e).to_json()
            }
        };
        let frame = match reply {
            Ok(frame) => frame,
            Err(e) => {
                warn!(session = self.id, error = %e, "failed to encode reply");
                return String::new();
            }
        };
        if let Err(e) = self.sink.try_send(frame.clone()) {
            debug!(session = self.id, error = %e, "reply not delivered");
        }
        frame
    }
}

impl<S: FrameSink> Drop for Session<S> {
    fn drop(&mut self) {
        self.fanout.unsubscribe(self.id);
    }
}
