//! Fan-out router: computes target rooms for an event and emits to them.
//!
//! Publishing is fire-and-forget. Callers persist first and publish after;
//! a failure here is logged and never surfaced, since the durable write has
//! already succeeded.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use society_entity::{Principal, PrincipalId, PrincipalKind, Role};

use crate::channel::room::RoomName;
use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundEvent;
use crate::metrics::RealtimeMetrics;

/// Which rooms an event goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientSelector {
    /// The shared room of a role. Resident roles have none.
    Role(Role),
    /// One principal's user room.
    User(PrincipalKind, PrincipalId),
    /// The union of several selectors.
    Combined(Vec<RecipientSelector>),
}

impl RecipientSelector {
    /// Admins and guards together.
    pub fn staff() -> Self {
        Self::Combined(vec![Self::Role(Role::Admin), Self::Role(Role::Guard)])
    }

    /// A principal's user room.
    pub fn principal(principal: &Principal) -> Self {
        Self::User(principal.role.kind(), principal.id)
    }

    /// Target rooms, without duplicates, in selector order.
    pub fn rooms(&self) -> Vec<RoomName> {
        let mut rooms = Vec::new();
        self.collect(&mut rooms);
        rooms
    }

    fn collect(&self, into: &mut Vec<RoomName>) {
        match self {
            Self::Role(role) => match RoomName::for_role(*role) {
                Some(room) if !into.contains(&room) => into.push(room),
                Some(_) => {}
                None => debug!(role = %role, "Role has no shared room"),
            },
            Self::User(kind, id) => {
                let room = RoomName::User(*kind, *id);
                if !into.contains(&room) {
                    into.push(room);
                }
            }
            Self::Combined(selectors) => {
                for selector in selectors {
                    selector.collect(into);
                }
            }
        }
    }
}

/// Result of one publish.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Rooms targeted.
    pub rooms: Vec<String>,
    /// Connections the frame was queued on.
    pub delivered: usize,
    /// Connections whose buffer was full or closed.
    pub dropped: usize,
}

/// Routes events to live channel rooms.
#[derive(Debug, Clone)]
pub struct FanoutRouter {
    connections: Arc<ConnectionManager>,
    metrics: Arc<RealtimeMetrics>,
}

impl FanoutRouter {
    /// Creates a router over a connection manager.
    pub fn new(connections: Arc<ConnectionManager>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            connections,
            metrics,
        }
    }

    /// Emit `event` to every connection currently in the selected rooms.
    pub fn publish(&self, event: &OutboundEvent, selector: &RecipientSelector) -> PublishReport {
        let rooms = selector.rooms();
        self.metrics.event_published();

        let frame = match event.to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(event = event.name(), error = %e, "Failed to serialize event; not published");
                return PublishReport::default();
            }
        };

        let count = self.connections.emit_frame(&rooms, &frame);
        let report = PublishReport {
            rooms: rooms.iter().map(ToString::to_string).collect(),
            delivered: count.delivered,
            dropped: count.dropped,
        };

        debug!(
            event = event.name(),
            rooms = ?report.rooms,
            delivered = report.delivered,
            dropped = report.dropped,
            "Event published"
        );
        if report.dropped > 0 {
            warn!(event = event.name(), dropped = report.dropped, "Some live deliveries dropped");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::registry::RoomRegistry;
    use society_core::config::RealtimeConfig;
    use society_entity::ResidentRole;
    use tokio::sync::mpsc;

    fn setup() -> (Arc<ConnectionManager>, FanoutRouter) {
        let metrics = Arc::new(RealtimeMetrics::new());
        let manager = Arc::new(ConnectionManager::new(
            RealtimeConfig::default(),
            Arc::new(RoomRegistry::new()),
            Arc::clone(&metrics),
        ));
        let router = FanoutRouter::new(Arc::clone(&manager), metrics);
        (manager, router)
    }

    fn connect(
        manager: &ConnectionManager,
        id: i64,
        role: Role,
        join: &str,
    ) -> mpsc::Receiver<String> {
        let (h, mut rx) = manager.register(Principal {
            id,
            role,
            email: format!("p{id}@example.com"),
            name: format!("P{id}"),
            contact: None,
            flat: None,
        });
        manager.handle_inbound(&h.id, join);
        let _ack = rx.try_recv().unwrap();
        rx
    }

    #[test]
    fn test_staff_selector_reaches_admins_and_guards() {
        let (manager, router) = setup();
        let mut admin = connect(&manager, 1, Role::Admin, r#"{"event":"join-role","data":"admins"}"#);
        let mut guard = connect(&manager, 1, Role::Guard, r#"{"event":"join-role","data":"guards"}"#);
        let mut resident = connect(
            &manager,
            1,
            Role::Resident(ResidentRole::Owner),
            r#"{"event":"join-user","data":1}"#,
        );

        let report = router.publish(&OutboundEvent::AlertResolved { id: 7 }, &RecipientSelector::staff());
        assert_eq!(report.rooms, vec!["admins", "guards"]);
        assert_eq!(report.delivered, 2);

        assert!(admin.try_recv().unwrap().contains("alert-resolved"));
        assert!(guard.try_recv().unwrap().contains("alert-resolved"));
        assert!(resident.try_recv().is_err());
    }

    #[test]
    fn test_user_selector_is_kind_scoped() {
        let (manager, router) = setup();
        let mut resident = connect(
            &manager,
            42,
            Role::Resident(ResidentRole::Tenant),
            r#"{"event":"join-user","data":42}"#,
        );
        let mut admin = connect(&manager, 42, Role::Admin, r#"{"event":"join-user","data":42}"#);

        let report = router.publish(
            &OutboundEvent::NotificationRead { id: 5 },
            &RecipientSelector::User(PrincipalKind::Resident, 42),
        );
        assert_eq!(report.rooms, vec!["user-42"]);
        assert_eq!(report.delivered, 1);
        assert!(resident.try_recv().is_ok());
        assert!(admin.try_recv().is_err());
    }

    #[test]
    fn test_publish_to_empty_room_is_not_an_error() {
        let (_manager, router) = setup();
        let report = router.publish(&OutboundEvent::AlertResolved { id: 1 }, &RecipientSelector::staff());
        assert_eq!(report.delivered, 0);
        assert_eq!(report.rooms.len(), 2);
    }

    #[test]
    fn test_combined_selector_dedups_rooms() {
        let selector = RecipientSelector::Combined(vec![
            RecipientSelector::staff(),
            RecipientSelector::Role(Role::Admin),
            RecipientSelector::Role(Role::Resident(ResidentRole::Owner)),
        ]);
        assert_eq!(selector.rooms(), vec![RoomName::Admins, RoomName::Guards]);
    }
}
