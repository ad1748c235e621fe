//! Default router implementation for the chat wire protocol.

use std::sync::Arc;

use async_trait::async_trait;

use hiroba_shared::time::Clock;

use crate::connection::Connection;
use crate::domain::{ChatRecord, MembershipStore, MessageContent, MessageStore, RoomKey, Timestamp};
use crate::hub::Hub;
use crate::infrastructure::dto::websocket::{InboundFrame, OutboundFrame};

use super::MessageRouter;

/// Routes decoded chat frames: validates membership, persists messages
/// fire-and-forget, and re-broadcasts through the hub.
pub struct ChatRouter {
    hub: Hub,
    messages: Arc<dyn MessageStore>,
    memberships: Arc<dyn MembershipStore>,
    clock: Arc<dyn Clock>,
}

impl ChatRouter {
    pub fn new(
        hub: Hub,
        messages: Arc<dyn MessageStore>,
        memberships: Arc<dyn MembershipStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            hub,
            messages,
            memberships,
            clock,
        }
    }

    async fn handle_message(&self, conn: &Connection, content: String) {
        let content = match MessageContent::new(content) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Connection {}: invalid message content dropped: {}", conn.id, e);
                return;
            }
        };

        let record = ChatRecord::new(
            conn.room.clone(),
            conn.user.clone(),
            content,
            Timestamp::new(self.clock.now_millis()),
        );
        let outbound = OutboundFrame::message(&record, conn.display_name.as_str());

        // Persistence is detached from the hot path: a failing append is
        // logged and never blocks or fails the broadcast.
        let store = Arc::clone(&self.messages);
        let record_id = record.id;
        tokio::spawn(async move {
            if let Err(e) = store.append(record).await {
                tracing::error!("Failed to persist message {}: {}", record_id, e);
            }
        });

        self.encode_and_broadcast(&conn.room, &outbound);
    }

    fn encode_and_broadcast(&self, room: &RoomKey, frame: &OutboundFrame) {
        match serde_json::to_vec(frame) {
            Ok(payload) => self.hub.broadcast(room, payload),
            Err(e) => tracing::error!("Failed to encode outbound frame: {}", e),
        }
    }
}

#[async_trait]
impl MessageRouter for ChatRouter {
    async fn on_message(&self, conn: &Connection, frame: &[u8]) {
        let inbound = match serde_json::from_slice::<InboundFrame>(frame) {
            Ok(inbound) => inbound,
            Err(e) => {
                // Malformed payloads drop the frame, never the connection.
                tracing::warn!("Connection {}: undecodable frame dropped: {}", conn.id, e);
                return;
            }
        };

        // Membership is validated per frame. A denial drops the frame; a
        // failing lookup is logged and lets the frame through rather than
        // aborting an otherwise-valid broadcast.
        match self.memberships.is_member(&conn.room, &conn.user).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    "Connection {}: user '{}' is not a member of room '{}', frame dropped",
                    conn.id,
                    conn.user,
                    conn.room
                );
                return;
            }
            Err(e) => {
                tracing::error!("Membership lookup failed for room '{}': {}", conn.room, e);
            }
        }

        match inbound {
            InboundFrame::Message { content } => self.handle_message(conn, content).await,
            InboundFrame::Typing => {
                let frame = OutboundFrame::typing(&conn.room, &conn.user, conn.display_name.as_str());
                self.encode_and_broadcast(&conn.room, &frame);
            }
            InboundFrame::Read { message_id } => {
                let frame = OutboundFrame::read(&conn.room, &conn.user, message_id);
                self.encode_and_broadcast(&conn.room, &frame);
            }
        }
    }
}
