//! Connection manager: registration, the join protocol, and room emits.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use society_core::config::RealtimeConfig;
use society_entity::{Principal, Role};

use crate::channel::registry::RoomRegistry;
use crate::channel::room::RoomName;
use crate::message::types::{InboundEvent, OutboundEvent};
use crate::message::validator::{MAX_MESSAGE_SIZE, validate_inbound};
use crate::metrics::RealtimeMetrics;

use super::handle::{ConnectionHandle, ConnectionId, SendOutcome};
use super::pool::ConnectionPool;

/// Counts from one emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitCount {
    /// Frames queued.
    pub delivered: usize,
    /// Frames dropped on full or closed connections.
    pub dropped: usize,
}

/// Manages all open live channel connections.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ConnectionPool,
    rooms: Arc<RoomRegistry>,
    metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        rooms: Arc<RoomRegistry>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            rooms,
            metrics,
            config,
        }
    }

    /// Registers an authenticated connection.
    ///
    /// Returns the handle and the receiver for its outbound frames. When the
    /// principal is already at the connection limit, the oldest connection
    /// is closed and removed.
    pub fn register(&self, principal: Principal) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(principal, tx));

        let key = (handle.principal.role.kind(), handle.principal.id);
        let existing = self.pool.principal_connections(&key);
        if self.config.max_connections_per_user > 0
            && existing.len() >= self.config.max_connections_per_user
        {
            if let Some(oldest) = existing.first() {
                warn!(
                    user_id = handle.principal.id,
                    max = self.config.max_connections_per_user,
                    replaced = %oldest.id,
                    "Principal at max connections, replacing oldest"
                );
                self.unregister(&oldest.id);
            }
        }

        self.pool.add(Arc::clone(&handle));
        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            user_id = handle.principal.id,
            role = %handle.principal.role,
            "Live connection registered"
        );

        (handle, rx)
    }

    /// Closes a connection and drops all of its room memberships.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.close();
            let rooms = self.rooms.leave_all(*conn_id);
            self.metrics.connection_closed();
            info!(
                conn_id = %conn_id,
                user_id = handle.principal.id,
                rooms = rooms.len(),
                "Live connection unregistered"
            );
        }
    }

    /// Processes one text frame from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return;
        };

        handle.touch();
        self.metrics.frame_received();

        if let Err(e) = validate_inbound(raw) {
            let code = if raw.len() > MAX_MESSAGE_SIZE {
                "MESSAGE_TOO_LARGE"
            } else {
                "INVALID_MESSAGE"
            };
            self.reply(&handle, OutboundEvent::error(code, e.message));
            return;
        }

        let event = match InboundEvent::parse(raw) {
            Ok(event) => event,
            Err(e) => {
                self.reply(&handle, OutboundEvent::error("INVALID_MESSAGE", e.message));
                return;
            }
        };

        match event {
            InboundEvent::JoinRole(requested) => self.join_role(&handle, &requested),
            InboundEvent::JoinUser(user_id) => self.join_user(&handle, user_id),
            InboundEvent::Pong => {}
        }
    }

    fn join_role(&self, handle: &ConnectionHandle, requested: &str) {
        let Some(room) = Role::from_room_hint(requested).and_then(RoomName::for_role) else {
            self.reply(
                handle,
                OutboundEvent::error("INVALID_ROOM", format!("No role room named '{requested}'")),
            );
            return;
        };

        if RoomName::for_role(handle.principal.role) != Some(room) {
            self.reply(
                handle,
                OutboundEvent::error(
                    "FORBIDDEN",
                    format!("Role '{}' may not join room '{room}'", handle.principal.role),
                ),
            );
            return;
        }

        self.join(handle, room);
    }

    fn join_user(&self, handle: &ConnectionHandle, user_id: i64) {
        if user_id != handle.principal.id {
            self.reply(
                handle,
                OutboundEvent::error("FORBIDDEN", format!("May not join room 'user-{user_id}'")),
            );
            return;
        }
        self.join(handle, RoomName::for_principal(&handle.principal));
    }

    /// Adds the connection to a room and acknowledges. Re-joining re-acks.
    fn join(&self, handle: &ConnectionHandle, room: RoomName) {
        if !self.rooms.is_member(&room, handle.id)
            && self.rooms.room_count_for(handle.id) >= self.config.max_rooms_per_connection
        {
            self.reply(
                handle,
                OutboundEvent::error(
                    "ROOM_LIMIT",
                    format!(
                        "Maximum rooms ({}) reached",
                        self.config.max_rooms_per_connection
                    ),
                ),
            );
            return;
        }

        if self.rooms.join(room, handle.id) {
            debug!(conn_id = %handle.id, room = %room, "Joined room");
        }
        // Closed while joining: unregister may already have cleaned up.
        if !handle.is_alive() {
            self.rooms.leave_all(handle.id);
            return;
        }
        self.reply(
            handle,
            OutboundEvent::Joined {
                room: room.to_string(),
            },
        );
    }

    fn reply(&self, handle: &ConnectionHandle, event: OutboundEvent) {
        match event.to_frame() {
            Ok(frame) => {
                if handle.send(frame) == SendOutcome::Queued {
                    self.metrics.frames_sent(1);
                } else {
                    self.metrics.frames_dropped(1);
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize reply"),
        }
    }

    /// Queues an already-serialized frame to every member of the given
    /// rooms, once per connection even if it is in several of them.
    ///
    /// Nothing is queued for absent members; empty rooms drop the frame.
    pub fn emit_frame(&self, rooms: &[RoomName], frame: &str) -> EmitCount {
        let mut targets: HashSet<ConnectionId> = HashSet::new();
        for room in rooms {
            targets.extend(self.rooms.members(room));
        }

        let mut count = EmitCount::default();
        for conn_id in targets {
            let Some(handle) = self.pool.get(&conn_id) else {
                continue;
            };
            match handle.send(frame.to_string()) {
                SendOutcome::Queued => count.delivered += 1,
                SendOutcome::Dropped | SendOutcome::Closed => count.dropped += 1,
            }
        }
        self.metrics.frames_sent(count.delivered as u64);
        self.metrics.frames_dropped(count.dropped as u64);
        count
    }

    /// Serializes `event` and emits it to `room`.
    pub fn emit(&self, room: &RoomName, event: &OutboundEvent) -> EmitCount {
        match event.to_frame() {
            Ok(frame) => self.emit_frame(std::slice::from_ref(room), &frame),
            Err(e) => {
                warn!(error = %e, event = event.name(), "Failed to serialize event");
                EmitCount::default()
            }
        }
    }

    /// Closes every connection.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            self.unregister(&conn.id);
        }
        info!(count = all.len(), "All live connections closed");
    }

    /// Room registry.
    pub fn rooms(&self) -> &Arc<RoomRegistry> {
        &self.rooms
    }

    /// Gets a connection by id.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Number of distinct connected principals.
    pub fn principal_count(&self) -> usize {
        self.pool.principal_count()
    }

    /// Live channel configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}
