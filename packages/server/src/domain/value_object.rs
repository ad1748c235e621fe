//! Value objects for the chat broadcast core.
//!
//! All identifiers arriving from the outside (credentials, path parameters,
//! payload fields) pass through these constructors, so the rest of the crate
//! never handles raw unvalidated strings.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Maximum length of a display name, in characters.
const MAX_DISPLAY_NAME_CHARS: usize = 64;

/// Maximum length of a chat message body, in characters.
const MAX_MESSAGE_CONTENT_CHARS: usize = 4096;

/// Opaque identifier of an authenticated user (UUID-like in practice).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId, rejecting empty input.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Empty("user id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque key of a conversation room.
///
/// Rooms are keyed by a composite of conversation kind and conversation id,
/// e.g. `direct:7f3a…` or `group:81c2…`. The broadcast core never inspects
/// the key beyond equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomKey(String);

impl RoomKey {
    /// Create a new RoomKey from an already-composed key.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Empty("room key"));
        }
        Ok(Self(value))
    }

    /// Key for a direct (one-to-one) conversation.
    pub fn direct(conversation_id: &str) -> Result<Self, ValidationError> {
        Self::new(format!("direct:{conversation_id}"))
    }

    /// Key for a group conversation.
    pub fn group(conversation_id: &str) -> Result<Self, ValidationError> {
        Self::new(format!("group:{conversation_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable name shown alongside a user's messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName; input is trimmed and length-bounded.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty("display name"));
        }
        if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(ValidationError::TooLong {
                field: "display name",
                max: MAX_DISPLAY_NAME_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Body of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent, rejecting empty and oversized bodies.
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::Empty("message content"));
        }
        if value.chars().count() > MAX_MESSAGE_CONTENT_CHARS {
            return Err(ValidationError::TooLong {
                field: "message content",
                max: MAX_MESSAGE_CONTENT_CHARS,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
