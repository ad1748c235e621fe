//! Persistence collaborator traits.
//!
//! The broadcast core records chat history and validates room membership
//! through these interfaces; the concrete stores (SQL, in-memory, remote
//! service) are an infrastructure concern. The core depends on the traits
//! only, so the dependency points inward.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{ChatRecord, UserProfile};
use super::error::{DirectoryError, StoreError};
use super::value_object::{RoomKey, UserId};

/// Store of persisted chat messages.
///
/// Appends are issued fire-and-forget from the router; a failing append is
/// logged and never blocks or fails the broadcast of the message.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one chat message to the room's history.
    async fn append(&self, record: ChatRecord) -> Result<(), StoreError>;
}

/// Store of room memberships.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Whether the user is a member of the room.
    async fn is_member(&self, room: &RoomKey, user: &UserId) -> Result<bool, StoreError>;
}

/// Lookup of user profiles by id.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a user profile; `DirectoryError::NotFound` is a
    /// distinguishable outcome, not a transport failure.
    async fn lookup(&self, user: &UserId) -> Result<UserProfile, DirectoryError>;
}
