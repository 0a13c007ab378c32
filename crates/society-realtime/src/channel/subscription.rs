//! Reverse index: which rooms each connection has joined.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

use super::room::RoomName;

/// Tracks connection-to-room memberships.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    conn_to_rooms: DashMap<ConnectionId, HashSet<RoomName>>,
}

impl SubscriptionTracker {
    /// Creates a new tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` on a connection's room set with its entry locked.
    ///
    /// Other calls for the same connection wait until `f` returns. Entries
    /// left empty by `f` are removed.
    pub fn with_rooms<R>(
        &self,
        conn_id: ConnectionId,
        f: impl FnOnce(&mut HashSet<RoomName>) -> R,
    ) -> R {
        let result = {
            let mut entry = self.conn_to_rooms.entry(conn_id).or_default();
            f(entry.value_mut())
        };
        self.conn_to_rooms.remove_if(&conn_id, |_, rooms| rooms.is_empty());
        result
    }

    /// Whether the connection has joined `room`.
    pub fn contains(&self, conn_id: ConnectionId, room: &RoomName) -> bool {
        self.conn_to_rooms
            .get(&conn_id)
            .is_some_and(|entry| entry.value().contains(room))
    }

    /// Number of rooms a connection has joined.
    pub fn count(&self, conn_id: ConnectionId) -> usize {
        self.conn_to_rooms
            .get(&conn_id)
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }
}
