//! The per-connection read and write pumps.
//!
//! Both pumps are generic over the stream/sink halves of the socket so the
//! loop logic can be exercised with in-memory channels in tests; production
//! code passes the split halves of an `axum` WebSocket.

use std::time::Duration;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::time::{interval, timeout};

use crate::hub::{ConnectionId, OutboundReceiver};
use crate::router::MessageRouter;

use super::Connection;

/// Maximum size of one inbound frame. Receipt of a larger frame is a fatal
/// read error for that connection.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// A connection with no inbound traffic at all (pongs included) for this
/// long is considered dead.
pub const READ_DEADLINE: Duration = Duration::from_secs(60);

/// Upper bound on one physical write to the peer.
pub const WRITE_DEADLINE: Duration = Duration::from_secs(10);

/// Liveness probe interval: 9/10 of [`READ_DEADLINE`], so pings arrive
/// comfortably before the peer's read deadline expires.
pub const PING_INTERVAL: Duration = Duration::from_secs(54);

/// Capacity of a connection's outbound queue, fixed at creation.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Read frames off the socket until the connection dies.
///
/// Each accepted frame is handed synchronously to the router before the
/// next one is read, so inbound frames of one connection are processed in
/// receipt order while different connections proceed fully concurrently.
/// Any exit from this loop is fatal to the connection; the caller performs
/// the unregistration.
pub async fn read_pump<St>(mut stream: St, conn: &Connection, router: &dyn MessageRouter)
where
    St: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    loop {
        let frame = match timeout(READ_DEADLINE, stream.next()).await {
            Err(_) => {
                tracing::warn!(
                    "Connection {}: no traffic for {:?}, treating peer as dead",
                    conn.id,
                    READ_DEADLINE
                );
                break;
            }
            Ok(None) => {
                tracing::info!("Connection {}: stream ended", conn.id);
                break;
            }
            Ok(Some(Err(e))) => {
                tracing::warn!("Connection {}: receive error: {}", conn.id, e);
                break;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        match frame {
            Message::Text(text) => {
                if text.len() > MAX_FRAME_BYTES {
                    tracing::warn!(
                        "Connection {}: oversized frame ({} bytes), closing",
                        conn.id,
                        text.len()
                    );
                    break;
                }
                router.on_message(conn, text.as_bytes()).await;
            }
            Message::Binary(data) => {
                if data.len() > MAX_FRAME_BYTES {
                    tracing::warn!(
                        "Connection {}: oversized frame ({} bytes), closing",
                        conn.id,
                        data.len()
                    );
                    break;
                }
                router.on_message(conn, &data).await;
            }
            Message::Ping(_) => {
                // Pong replies are handled by the WebSocket layer itself.
                tracing::trace!("Connection {}: ping received", conn.id);
            }
            Message::Pong(_) => {
                // Liveness acknowledgment; the next loop turn restarts the
                // read deadline.
                tracing::trace!("Connection {}: pong received", conn.id);
            }
            Message::Close(frame) => {
                tracing::info!("Connection {}: peer closed ({:?})", conn.id, frame);
                break;
            }
        }
    }
}

/// Drain the outbound queue onto the socket until the queue closes or a
/// write fails.
///
/// Items that are already queued when the pump wakes are coalesced into a
/// single flush; frame boundaries are preserved by the WebSocket framing.
/// Independently of queued data, a ping is emitted every [`PING_INTERVAL`]
/// to keep idle connections alive.
pub async fn write_pump<Si>(mut sink: Si, mut outbound: OutboundReceiver, conn_id: ConnectionId)
where
    Si: Sink<Message> + Unpin,
    Si::Error: std::fmt::Display,
{
    let mut ping = interval(PING_INTERVAL);
    // The first tick of an interval fires immediately; consume it so the
    // first ping goes out one full interval after the connection opens.
    ping.tick().await;

    loop {
        tokio::select! {
            item = outbound.recv() => {
                let Some(payload) = item else {
                    // Queue closed: the connection was unregistered or
                    // evicted. Terminate cleanly.
                    tracing::debug!("Connection {}: outbound queue closed", conn_id);
                    break;
                };
                if let Err(e) = write_batch(&mut sink, &mut outbound, payload).await {
                    tracing::warn!("Connection {}: write failed: {}", conn_id, e);
                    break;
                }
            }
            _ = ping.tick() => {
                if let Err(e) = send_with_deadline(&mut sink, Message::Ping(vec![1, 2, 3, 4].into())).await {
                    tracing::warn!("Connection {}: ping failed: {}", conn_id, e);
                    break;
                }
            }
        }
    }

    // Best-effort close frame; the stream is going away either way.
    let _ = timeout(WRITE_DEADLINE, sink.send(Message::Close(None))).await;
}

/// Write one payload plus anything else already queued, then flush once.
async fn write_batch<Si>(
    sink: &mut Si,
    outbound: &mut OutboundReceiver,
    first: Vec<u8>,
) -> Result<(), String>
where
    Si: Sink<Message> + Unpin,
    Si::Error: std::fmt::Display,
{
    sink.feed(Message::Binary(first.into()))
        .await
        .map_err(|e| e.to_string())?;
    while let Ok(payload) = outbound.try_recv() {
        sink.feed(Message::Binary(payload.into()))
            .await
            .map_err(|e| e.to_string())?;
    }
    match timeout(WRITE_DEADLINE, sink.flush()).await {
        Err(_) => Err(format!("write deadline of {WRITE_DEADLINE:?} expired")),
        Ok(Err(e)) => Err(e.to_string()),
        Ok(Ok(())) => Ok(()),
    }
}

/// Send one message with the write deadline applied.
async fn send_with_deadline<Si>(sink: &mut Si, message: Message) -> Result<(), String>
where
    Si: Sink<Message> + Unpin,
    Si::Error: std::fmt::Display,
{
    match timeout(WRITE_DEADLINE, sink.send(message)).await {
        Err(_) => Err(format!("write deadline of {WRITE_DEADLINE:?} expired")),
        Ok(Err(e)) => Err(e.to_string()),
        Ok(Ok(())) => Ok(()),
    }
}
