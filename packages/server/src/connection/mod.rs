//! One live WebSocket session bound to a room and a user.
//!
//! A connection is two concurrently running pumps coupled only by its
//! bounded outbound queue: the read pump feeds inbound frames to the
//! router, the write pump drains the queue onto the socket. Either pump
//! detecting termination tears the whole connection down through
//! [`Hub::unregister`].

mod pump;

use axum::extract::ws::WebSocket;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::{DisplayName, RoomKey, UserId};
use crate::hub::{ConnectionId, Hub};
use crate::router::MessageRouter;

pub use pump::{
    MAX_FRAME_BYTES, OUTBOUND_QUEUE_CAPACITY, PING_INTERVAL, READ_DEADLINE, WRITE_DEADLINE,
};

/// Identity of one live connection, as seen by the router.
///
/// A connection belongs to exactly one room and one user for its entire
/// lifetime; it is never moved between rooms.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub user: UserId,
    pub display_name: DisplayName,
    pub room: RoomKey,
}

/// Register an authenticated session with the hub and run its pumps.
///
/// Returns when the connection is torn down: read error, protocol close,
/// read-deadline expiry, write failure or queue closure (unregistration /
/// eviction) all end here, and every path funnels through
/// `Hub::unregister` so membership never leaks a stale entry.
pub async fn join(
    socket: WebSocket,
    user: UserId,
    display_name: DisplayName,
    room: RoomKey,
    hub: Hub,
    router: Arc<dyn MessageRouter>,
) {
    let conn = Connection {
        id: ConnectionId::next(),
        user,
        display_name,
        room,
    };
    let conn_id = conn.id;
    let room = conn.room.clone();

    // The outbound queue: fed by the hub's fan-out, drained by the write
    // pump. Capacity is fixed at creation; the hub's only sender lives in
    // the registry, so eviction or unregistration closes the queue.
    let (sender, receiver) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    hub.register(room.clone(), conn_id, sender);

    tracing::info!(
        "Connection {}: user '{}' ({}) joined room '{}'",
        conn_id,
        conn.user,
        conn.display_name.as_str(),
        room
    );

    let (sink, stream) = socket.split();

    let mut write_task = tokio::spawn(pump::write_pump(sink, receiver, conn_id));
    let mut read_task = tokio::spawn(async move {
        pump::read_pump(stream, &conn, router.as_ref()).await;
    });

    // Whichever pump finishes first takes the other one down with it.
    tokio::select! {
        _ = &mut read_task => write_task.abort(),
        _ = &mut write_task => read_task.abort(),
    }

    hub.unregister(room.clone(), conn_id);
    tracing::info!("Connection {}: left room '{}'", conn_id, room);
}
