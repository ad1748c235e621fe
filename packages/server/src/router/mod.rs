//! Message routing: the per-frame integration point of the broadcast core.
//!
//! The read pump hands every inbound frame to a [`MessageRouter`]. What a
//! frame *means* (chat message, typing indicator, read receipt) is router
//! policy; the hub and the pumps treat payloads as opaque bytes.

mod chat;

use async_trait::async_trait;

use crate::connection::Connection;

pub use chat::ChatRouter;

/// Caller-supplied handler for inbound frames.
///
/// Invoked from the inbound pump's execution context, one frame at a time
/// per connection, in receipt order. The implementation must not block
/// indefinitely: it delays subsequent frames from the same connection
/// (never other connections).
#[async_trait]
pub trait MessageRouter: Send + Sync {
    async fn on_message(&self, conn: &Connection, frame: &[u8]);
}
