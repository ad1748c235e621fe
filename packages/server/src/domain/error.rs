//! Error types for the chat broadcast core.

use thiserror::Error;

/// Validation failure while constructing a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field was empty or whitespace-only
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// The field exceeded its maximum length
    #[error("{field} exceeds the maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Failure to turn a credential into a verified user identity.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential is expired, malformed or unknown
    #[error("invalid credential")]
    InvalidCredential,

    /// The authenticator backend could not be reached
    #[error("authentication backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure to resolve a user from the user directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No user exists for the given id
    #[error("user '{0}' not found")]
    NotFound(String),

    /// The directory backend could not be reached
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Failure inside a persistence store (messages, memberships).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The store backend could not be reached or rejected the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
