//! Room membership bookkeeping and fan-out.
//!
//! `RoomRegistry` is a plain data structure; it is owned exclusively by the
//! hub worker task and is never shared or locked. Keeping it free of
//! channels and tasks makes the membership rules easy to test.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::domain::RoomKey;

use super::{ConnectionId, OutboundSender};

/// Result of one broadcast pass over a room.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// Members whose queue accepted the payload
    pub delivered: usize,
    /// Members evicted because their queue was full or already closed
    pub evicted: Vec<ConnectionId>,
}

/// The authoritative room → members mapping.
///
/// Rooms are created lazily on the first register and removed when the last
/// member leaves, so a listing only ever shows active conversations.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomKey, HashMap<ConnectionId, OutboundSender>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the room's member set, creating the room if
    /// absent. Re-registering the same connection id is a no-op under set
    /// semantics.
    pub fn register(&mut self, room: RoomKey, conn: ConnectionId, sender: OutboundSender) {
        self.rooms.entry(room).or_default().insert(conn, sender);
    }

    /// Remove a connection from its room, dropping its outbound sender.
    ///
    /// Dropping the sender is the close signal for the connection's write
    /// pump. Removing the last member removes the room entry. Returns
    /// `true` if the connection was present; calling again is a no-op.
    pub fn unregister(&mut self, room: &RoomKey, conn: ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(&conn).is_some();
        if members.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }

    /// Enqueue the payload onto every member's outbound queue.
    ///
    /// Delivery is a non-blocking `try_send` per member: a member whose
    /// queue is full is evicted (removed from the room, sender dropped)
    /// instead of stalling the fan-out for the others. A member whose queue
    /// is already closed is cleaned up the same way.
    pub fn broadcast(&mut self, room: &RoomKey, payload: &[u8]) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        let Some(members) = self.rooms.get_mut(room) else {
            return outcome;
        };

        for (conn, sender) in members.iter() {
            match sender.try_send(payload.to_vec()) {
                Ok(()) => outcome.delivered += 1,
                Err(mpsc::error::TrySendError::Full(_))
                | Err(mpsc::error::TrySendError::Closed(_)) => {
                    outcome.evicted.push(*conn);
                }
            }
        }

        for conn in &outcome.evicted {
            members.remove(conn);
        }
        if members.is_empty() {
            self.rooms.remove(room);
        }

        outcome
    }

    /// Point-in-time member count for the room (0 when absent).
    pub fn online_count(&self, room: &RoomKey) -> usize {
        self.rooms.get(room).map_or(0, HashMap::len)
    }

    /// Active rooms with their member counts.
    pub fn rooms(&self) -> Vec<(RoomKey, usize)> {
        self.rooms
            .iter()
            .map(|(key, members)| (key.clone(), members.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::Receiver;

    fn test_room(name: &str) -> RoomKey {
        RoomKey::new(name.to_string()).unwrap()
    }

    fn test_member(capacity: usize) -> (OutboundSender, Receiver<Vec<u8>>) {
        mpsc::channel(capacity)
    }

    #[test]
    fn test_register_creates_room_lazily() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        assert_eq!(registry.online_count(&room), 0);
        assert!(registry.rooms().is_empty());

        // when:
        let (tx, _rx) = test_member(4);
        registry.register(room.clone(), ConnectionId(1), tx);

        // then:
        assert_eq!(registry.online_count(&room), 1);
        assert_eq!(registry.rooms(), vec![(room, 1)]);
    }

    #[test]
    fn test_register_same_connection_twice_is_noop() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (tx, _rx) = test_member(4);

        // when:
        registry.register(room.clone(), ConnectionId(1), tx.clone());
        registry.register(room.clone(), ConnectionId(1), tx);

        // then:
        assert_eq!(registry.online_count(&room), 1);
    }

    #[test]
    fn test_member_count_after_registers_and_unregisters() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let mut receivers = Vec::new();
        for n in 0..5 {
            let (tx, rx) = test_member(4);
            registry.register(room.clone(), ConnectionId(n), tx);
            receivers.push(rx);
        }

        // when:
        registry.unregister(&room, ConnectionId(0));
        registry.unregister(&room, ConnectionId(1));

        // then: 5 registers, 2 unregisters
        assert_eq!(registry.online_count(&room), 3);
    }

    #[test]
    fn test_room_is_removed_when_last_member_leaves() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (tx, _rx) = test_member(4);
        registry.register(room.clone(), ConnectionId(1), tx);

        // when:
        registry.unregister(&room, ConnectionId(1));

        // then: the room no longer appears in any listing
        assert_eq!(registry.online_count(&room), 0);
        assert!(registry.rooms().is_empty());
    }

    #[test]
    fn test_unregister_is_idempotent() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (tx, _rx) = test_member(4);
        registry.register(room.clone(), ConnectionId(1), tx);

        // when:
        let first = registry.unregister(&room, ConnectionId(1));
        let second = registry.unregister(&room, ConnectionId(1));

        // then: same end state, no double-removal fault
        assert!(first);
        assert!(!second);
        assert_eq!(registry.online_count(&room), 0);
    }

    #[test]
    fn test_unregister_closes_the_outbound_queue() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (tx, mut rx) = test_member(4);
        registry.register(room.clone(), ConnectionId(1), tx);

        // when:
        registry.unregister(&room, ConnectionId(1));

        // then: the write pump sees a closed queue
        assert_eq!(rx.try_recv(), Err(mpsc::error::TryRecvError::Disconnected));
    }

    #[test]
    fn test_broadcast_reaches_every_member() {
        // given:
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let mut receivers = Vec::new();
        for n in 0..3 {
            let (tx, rx) = test_member(4);
            registry.register(room.clone(), ConnectionId(n), tx);
            receivers.push(rx);
        }

        // when:
        let outcome = registry.broadcast(&room, b"hello");

        // then:
        assert_eq!(outcome.delivered, 3);
        assert!(outcome.evicted.is_empty());
        for rx in &mut receivers {
            assert_eq!(rx.try_recv().unwrap(), b"hello");
        }
    }

    #[test]
    fn test_broadcast_to_unknown_room_is_noop() {
        // given:
        let mut registry = RoomRegistry::new();

        // when:
        let outcome = registry.broadcast(&test_room("nowhere"), b"hello");

        // then:
        assert_eq!(outcome, BroadcastOutcome::default());
    }

    #[test]
    fn test_full_queue_member_is_evicted_and_others_still_receive() {
        // given: one member with a full queue, one healthy member
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (slow_tx, _slow_rx) = test_member(1);
        slow_tx.try_send(b"backlog".to_vec()).unwrap();
        let (healthy_tx, mut healthy_rx) = test_member(4);
        registry.register(room.clone(), ConnectionId(1), slow_tx);
        registry.register(room.clone(), ConnectionId(2), healthy_tx);

        // when:
        let outcome = registry.broadcast(&room, b"hello");

        // then: the healthy member receives, the slow one is removed
        assert_eq!(outcome.delivered, 1);
        assert_eq!(outcome.evicted, vec![ConnectionId(1)]);
        assert_eq!(healthy_rx.try_recv().unwrap(), b"hello");
        assert_eq!(registry.online_count(&room), 1);
    }

    #[test]
    fn test_never_draining_member_is_evicted_after_capacity_broadcasts() {
        // given: a member with the reference queue capacity that never drains
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (tx, _rx) = test_member(256);
        registry.register(room.clone(), ConnectionId(1), tx);

        // when: 256 broadcasts fill the queue without evicting
        for n in 0..256u32 {
            let outcome = registry.broadcast(&room, &n.to_be_bytes());
            assert_eq!(outcome.delivered, 1, "broadcast {n} should still deliver");
        }
        // the 257th detects the full queue
        let outcome = registry.broadcast(&room, b"overflow");

        // then: evicted without any error surfacing to the broadcaster
        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.evicted, vec![ConnectionId(1)]);
        assert_eq!(registry.online_count(&room), 0);
        assert!(registry.rooms().is_empty());
    }

    #[test]
    fn test_closed_queue_member_is_cleaned_up_on_broadcast() {
        // given: a member whose receiver was dropped (pump already gone)
        let mut registry = RoomRegistry::new();
        let room = test_room("r1");
        let (tx, rx) = test_member(4);
        drop(rx);
        registry.register(room.clone(), ConnectionId(1), tx);

        // when:
        let outcome = registry.broadcast(&room, b"hello");

        // then:
        assert_eq!(outcome.evicted, vec![ConnectionId(1)]);
        assert_eq!(registry.online_count(&room), 0);
    }

    #[test]
    fn test_broadcasts_are_scoped_to_their_room() {
        // given:
        let mut registry = RoomRegistry::new();
        let (tx_a, mut rx_a) = test_member(4);
        let (tx_b, mut rx_b) = test_member(4);
        registry.register(test_room("a"), ConnectionId(1), tx_a);
        registry.register(test_room("b"), ConnectionId(2), tx_b);

        // when:
        registry.broadcast(&test_room("a"), b"only-a");

        // then:
        assert_eq!(rx_a.try_recv().unwrap(), b"only-a");
        assert!(rx_b.try_recv().is_err());
    }
}
