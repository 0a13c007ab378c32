//! Room registry: room name to member connections.
//!
//! Only [`RoomRegistry::join`] and [`RoomRegistry::leave_all`] mutate
//! membership. Empty rooms are removed.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

use super::room::RoomName;
use super::subscription::SubscriptionTracker;

/// Registry of all non-empty rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomName, HashSet<ConnectionId>>,
    memberships: SubscriptionTracker,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to a room. Returns `false` if it was already a member.
    pub fn join(&self, room: RoomName, conn_id: ConnectionId) -> bool {
        // Lock order is always membership entry, then room.
        self.memberships.with_rooms(conn_id, |joined| {
            joined.insert(room);
            self.rooms.entry(room).or_default().insert(conn_id)
        })
    }

    /// Removes a connection from every room it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) -> HashSet<RoomName> {
        self.memberships.with_rooms(conn_id, |joined| {
            let rooms = std::mem::take(joined);
            for room in &rooms {
                if let Some(mut members) = self.rooms.get_mut(room) {
                    members.remove(&conn_id);
                    if members.is_empty() {
                        drop(members);
                        self.rooms.remove_if(room, |_, m| m.is_empty());
                    }
                }
            }
            rooms
        })
    }

    /// Current members of a room.
    pub fn members(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether a connection is in a room.
    pub fn is_member(&self, room: &RoomName, conn_id: ConnectionId) -> bool {
        self.memberships.contains(conn_id, room)
    }

    /// Number of rooms a connection has joined.
    pub fn room_count_for(&self, conn_id: ConnectionId) -> usize {
        self.memberships.count(conn_id)
    }

    /// Number of members in a room.
    pub fn member_count(&self, room: &RoomName) -> usize {
        self.rooms.get(room).map(|m| m.len()).unwrap_or(0)
    }

    /// Number of non-empty rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
