//! Domain entities persisted or resolved through the collaborator stores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_object::{DisplayName, MessageContent, RoomKey, Timestamp, UserId};

/// A chat message as handed to the message store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: Uuid,
    pub room: RoomKey,
    pub sender: UserId,
    pub content: MessageContent,
    pub sent_at: Timestamp,
}

impl ChatRecord {
    pub fn new(room: RoomKey, sender: UserId, content: MessageContent, sent_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            room,
            sender,
            content,
            sent_at,
        }
    }
}

/// A user as resolved from the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: DisplayName,
}
