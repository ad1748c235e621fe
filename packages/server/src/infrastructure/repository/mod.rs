//! Concrete implementations of the persistence collaborator traits.

mod inmemory;

pub use inmemory::{InMemoryMembershipStore, InMemoryMessageStore, InMemoryUserDirectory};
