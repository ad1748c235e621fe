//! In-memory implementations of the persistence traits.
//!
//! `Mutex<HashMap>`-backed stores for the demo binary and the test suites.
//! They implement the domain traits so the rest of the system never knows
//! the difference (dependency inversion).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRecord, DirectoryError, MembershipStore, MessageStore, RoomKey, StoreError, UserDirectory,
    UserId, UserProfile,
};

/// In-memory chat history, newest record last.
#[derive(Default)]
pub struct InMemoryMessageStore {
    records: Mutex<Vec<ChatRecord>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub async fn records(&self) -> Vec<ChatRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, record: ChatRecord) -> Result<(), StoreError> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

/// In-memory room membership table.
#[derive(Default)]
pub struct InMemoryMembershipStore {
    memberships: Mutex<HashMap<RoomKey, HashSet<UserId>>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the user a member of the room.
    pub async fn grant(&self, room: RoomKey, user: UserId) {
        self.memberships
            .lock()
            .await
            .entry(room)
            .or_default()
            .insert(user);
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn is_member(&self, room: &RoomKey, user: &UserId) -> Result<bool, StoreError> {
        Ok(self
            .memberships
            .lock()
            .await
            .get(room)
            .is_some_and(|members| members.contains(user)))
    }
}

/// In-memory user directory.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, profile: UserProfile) {
        self.profiles.lock().await.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn lookup(&self, user: &UserId) -> Result<UserProfile, DirectoryError> {
        self.profiles
            .lock()
            .await
            .get(user)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(user.as_str().to_string()))
    }
}
