//! Infrastructure layer: DTOs and reference collaborator implementations.
//!
//! The in-memory stores exist for the binary and the test suites; a real
//! deployment supplies its own implementations of the domain traits.

pub mod auth;
pub mod dto;
pub mod repository;

pub use auth::StaticTokenAuthenticator;
pub use repository::{InMemoryMembershipStore, InMemoryMessageStore, InMemoryUserDirectory};
