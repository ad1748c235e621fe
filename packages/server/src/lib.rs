//! Real-time room broadcast core for the hiroba chat subsystem.
//!
//! The crate is organized around three runtime components:
//!
//! - [`hub`]: the room registry — a single-owner state machine that tracks
//!   which connections belong to which room and fans messages out to room
//!   members, reachable only through a command channel.
//! - [`connection`]: the per-connection read/write pumps that bridge one
//!   WebSocket to the hub through a bounded outbound queue.
//! - [`router`]: the per-frame integration point that validates, persists
//!   and re-broadcasts inbound messages.
//!
//! External collaborators (authentication, persistence, user lookup) are
//! consumed through the traits in [`domain`]; [`infrastructure`] provides
//! in-memory implementations for the binary and the test suites, and the
//! wire-level DTOs. [`ui`] is the axum surface.

pub mod connection;
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod router;
pub mod ui;
