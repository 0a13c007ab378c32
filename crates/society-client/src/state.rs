//! Locally held, newest-first view of alerts and notifications.

use std::collections::HashSet;

use chrono::Utc;

use society_entity::{Alert, AlertStatus, Notification};
use society_realtime::OutboundEvent;

/// Merged client view.
///
/// Pushed events are prepended without waiting for a poll; a poll result
/// replaces the view but keeps pushed items it does not know about yet.
#[derive(Debug, Clone, Default)]
pub struct LiveState {
    /// Alerts, newest first.
    pub alerts: Vec<Alert>,
    /// Notifications, newest first.
    pub notifications: Vec<Notification>,
}

impl LiveState {
    /// Empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unread notifications in the view.
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    /// Apply one pushed event. Returns whether the view changed.
    pub fn apply(&mut self, event: &OutboundEvent) -> bool {
        match event {
            OutboundEvent::NewAlert(alert) => {
                if self.alerts.iter().any(|a| a.id == alert.id) {
                    return false;
                }
                self.alerts.insert(0, alert.clone());
                true
            }
            OutboundEvent::AlertResolved { id } => self.resolve_alert(*id),
            OutboundEvent::Notification(notification) => {
                if self.notifications.iter().any(|n| n.id == notification.id) {
                    return false;
                }
                self.notifications.insert(0, notification.clone());
                true
            }
            OutboundEvent::NotificationRead { id } => self.mark_read(*id),
            OutboundEvent::NotificationsReadAll { .. } => self.mark_all_read() > 0,
            OutboundEvent::Joined { .. } | OutboundEvent::Ping { .. } | OutboundEvent::Error { .. } => {
                false
            }
        }
    }

    /// Set one notification read locally.
    pub fn mark_read(&mut self, id: i64) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.is_read => {
                n.is_read = true;
                true
            }
            _ => false,
        }
    }

    /// Set every notification read locally. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.notifications.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            changed += 1;
        }
        changed
    }

    fn resolve_alert(&mut self, id: i64) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(a) if a.status == AlertStatus::Active => {
                a.status = AlertStatus::Resolved;
                a.resolved_at = Some(Utc::now());
                true
            }
            _ => false,
        }
    }

    /// Replace the notifications with a fetched history, keeping pushed
    /// items the history does not contain.
    ///
    /// Read state only moves forward: a copy already read locally stays read
    /// even if the fetch started before the server recorded it.
    pub fn reconcile_notifications(&mut self, mut fetched: Vec<Notification>) {
        let read: HashSet<i64> = self
            .notifications
            .iter()
            .filter(|n| n.is_read)
            .map(|n| n.id)
            .collect();
        for n in fetched.iter_mut().filter(|n| read.contains(&n.id)) {
            n.is_read = true;
        }
        let known: HashSet<i64> = fetched.iter().map(|n| n.id).collect();
        let mut merged: Vec<Notification> = self
            .notifications
            .drain(..)
            .filter(|n| !known.contains(&n.id))
            .collect();
        merged.extend(fetched);
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.notifications = merged;
    }

    /// Replace the alerts with a fetched history, keeping pushed items the
    /// history does not contain.
    pub fn reconcile_alerts(&mut self, fetched: Vec<Alert>) {
        let known: HashSet<i64> = fetched.iter().map(|a| a.id).collect();
        let mut merged: Vec<Alert> = self
            .alerts
            .drain(..)
            .filter(|a| !known.contains(&a.id))
            .collect();
        merged.extend(fetched);
        merged.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.alerts = merged;
    }
}
