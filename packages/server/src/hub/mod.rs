//! The room registry hub: single source of truth for room membership.
//!
//! All membership mutation and fan-out goes through one worker task that
//! owns the [`RoomRegistry`] exclusively and processes commands in arrival
//! order. This gives a total order over membership changes and broadcasts
//! without locking: a broadcast issued after a register is guaranteed to
//! consider the new member, and one issued after an unregister will not
//! attempt to deliver to it.
//!
//! [`Hub`] is the cloneable handle; every part of the system talks to the
//! registry by sending commands through it.

mod registry;

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::domain::RoomKey;

pub use registry::{BroadcastOutcome, RoomRegistry};

/// Process-unique identifier of one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocate the next connection id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sending half of a connection's bounded outbound queue.
pub type OutboundSender = mpsc::Sender<Vec<u8>>;

/// Receiving half of a connection's bounded outbound queue, drained by the
/// write pump.
pub type OutboundReceiver = mpsc::Receiver<Vec<u8>>;

/// The hub worker is no longer running.
#[derive(Debug, Error)]
#[error("room registry worker is not running")]
pub struct HubClosed;

/// Requests processed by the hub worker, strictly in arrival order.
enum HubCommand {
    Register {
        room: RoomKey,
        conn: ConnectionId,
        sender: OutboundSender,
    },
    Unregister {
        room: RoomKey,
        conn: ConnectionId,
    },
    Broadcast {
        room: RoomKey,
        payload: Vec<u8>,
    },
    OnlineCount {
        room: RoomKey,
        reply: oneshot::Sender<usize>,
    },
    Rooms {
        reply: oneshot::Sender<Vec<(RoomKey, usize)>>,
    },
}

/// Cloneable handle to the room registry worker.
#[derive(Clone)]
pub struct Hub {
    commands: mpsc::UnboundedSender<HubCommand>,
}

impl Hub {
    /// Spawn the registry worker and return a handle to it.
    ///
    /// The worker stops once every handle has been dropped.
    pub fn spawn() -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx));
        Self { commands }
    }

    /// Add a connection to the named room, creating the room if absent.
    ///
    /// Fire-and-forget and idempotent; this is the point at which the
    /// connection becomes visible to broadcasts.
    pub fn register(&self, room: RoomKey, conn: ConnectionId, sender: OutboundSender) {
        self.send(HubCommand::Register { room, conn, sender });
    }

    /// Remove a connection from its room and close its outbound queue.
    ///
    /// Safe to call multiple times; every disconnection path funnels
    /// through here so membership never leaks a stale entry.
    pub fn unregister(&self, room: RoomKey, conn: ConnectionId) {
        self.send(HubCommand::Unregister { room, conn });
    }

    /// Enqueue the payload for every current member of the room.
    ///
    /// Fire-and-forget: no delivery acknowledgment, and a slow member is
    /// evicted rather than surfacing an error to the broadcaster.
    pub fn broadcast(&self, room: &RoomKey, payload: Vec<u8>) {
        self.send(HubCommand::Broadcast {
            room: room.clone(),
            payload,
        });
    }

    /// Point-in-time member count for the room.
    pub async fn online_count(&self, room: &RoomKey) -> Result<usize, HubClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::OnlineCount {
            room: room.clone(),
            reply,
        });
        rx.await.map_err(|_| HubClosed)
    }

    /// Active rooms with their member counts.
    pub async fn rooms(&self) -> Result<Vec<(RoomKey, usize)>, HubClosed> {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Rooms { reply });
        rx.await.map_err(|_| HubClosed)
    }

    fn send(&self, command: HubCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Room registry worker is gone, command dropped");
        }
    }
}

/// The registry worker: sole owner of the room → members mapping.
async fn run(mut commands: mpsc::UnboundedReceiver<HubCommand>) {
    let mut registry = RoomRegistry::new();

    while let Some(command) = commands.recv().await {
        match command {
            HubCommand::Register { room, conn, sender } => {
                registry.register(room.clone(), conn, sender);
                tracing::debug!(
                    "Connection {} registered to room '{}' ({} online)",
                    conn,
                    room,
                    registry.online_count(&room)
                );
            }
            HubCommand::Unregister { room, conn } => {
                if registry.unregister(&room, conn) {
                    tracing::debug!(
                        "Connection {} unregistered from room '{}' ({} online)",
                        conn,
                        room,
                        registry.online_count(&room)
                    );
                }
            }
            HubCommand::Broadcast { room, payload } => {
                let outcome = registry.broadcast(&room, &payload);
                for conn in &outcome.evicted {
                    tracing::warn!(
                        "Connection {} evicted from room '{}': outbound queue full or closed",
                        conn,
                        room
                    );
                }
            }
            HubCommand::OnlineCount { room, reply } => {
                let _ = reply.send(registry.online_count(&room));
            }
            HubCommand::Rooms { reply } => {
                let _ = reply.send(registry.rooms());
            }
        }
    }

    tracing::info!("Room registry worker stopped");
}
