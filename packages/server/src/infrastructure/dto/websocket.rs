//! Wire-level frame envelopes.
//!
//! JSON envelopes tagged by `type`. The hub and the pumps never look inside
//! these; encoding and decoding happen at the router boundary only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ChatRecord, RoomKey, UserId};

/// Frame received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundFrame {
    /// A chat message to persist and broadcast
    Message { content: String },
    /// The sender is typing; pass-through, never persisted
    Typing,
    /// The sender has read up to the given message; pass-through
    Read { message_id: Uuid },
}

/// Frame broadcast to room members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundFrame {
    Message {
        id: Uuid,
        room: String,
        sender: String,
        sender_name: String,
        content: String,
        sent_at: i64,
    },
    Typing {
        room: String,
        sender: String,
        sender_name: String,
    },
    Read {
        room: String,
        sender: String,
        message_id: Uuid,
    },
}

impl OutboundFrame {
    /// Envelope for a persisted chat message.
    pub fn message(record: &ChatRecord, sender_name: &str) -> Self {
        Self::Message {
            id: record.id,
            room: record.room.as_str().to_string(),
            sender: record.sender.as_str().to_string(),
            sender_name: sender_name.to_string(),
            content: record.content.as_str().to_string(),
            sent_at: record.sent_at.value(),
        }
    }

    /// Envelope for a typing indicator.
    pub fn typing(room: &RoomKey, sender: &UserId, sender_name: &str) -> Self {
        Self::Typing {
            room: room.as_str().to_string(),
            sender: sender.as_str().to_string(),
            sender_name: sender_name.to_string(),
        }
    }

    /// Envelope for a read receipt.
    pub fn read(room: &RoomKey, sender: &UserId, message_id: Uuid) -> Self {
        Self::Read {
            room: room.as_str().to_string(),
            sender: sender.as_str().to_string(),
            message_id,
        }
    }
}
