//! Domain layer: value objects, entities, errors and collaborator traits.
//!
//! The traits defined here are the seams to the surrounding application
//! (authentication, persistence, user lookup). The broadcast core depends
//! on these interfaces only; concrete implementations live in the
//! `infrastructure` layer or in the embedding application.

mod auth;
mod entity;
mod error;
mod repository;
mod value_object;

pub use auth::Authenticator;
pub use entity::{ChatRecord, UserProfile};
pub use error::{AuthError, DirectoryError, StoreError, ValidationError};
pub use repository::{MembershipStore, MessageStore, UserDirectory};
pub use value_object::{DisplayName, MessageContent, RoomKey, Timestamp, UserId};

#[cfg(test)]
pub use repository::{MockMembershipStore, MockMessageStore, MockUserDirectory};
