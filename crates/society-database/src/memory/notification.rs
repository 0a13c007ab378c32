//! In-memory notification store.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use society_core::result::AppResult;
use society_entity::{NewNotification, Notification, PrincipalId, PrincipalKind, Recipient};

use crate::store::NotificationStore;

/// Notification store held in a `DashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotificationStore {
    rows: Arc<DashMap<i64, Notification>>,
    sequence: Arc<AtomicI64>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_by(n: &Notification, kind: PrincipalKind, user_id: PrincipalId) -> bool {
        n.recipient_kind == kind && n.user_id == user_id
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(
        &self,
        recipient: Recipient,
        content: &NewNotification,
    ) -> AppResult<Notification> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let row = Notification {
            id,
            user_id: recipient.user_id,
            recipient_kind: recipient.kind(),
            recipient_role: recipient.role.as_str().to_string(),
            kind: content.kind.clone(),
            title: content.title.clone(),
            message: content.message.clone(),
            data: content.data.clone(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn list_for_user(
        &self,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<Vec<Notification>> {
        let mut rows: Vec<Notification> = self
            .rows
            .iter()
            .filter(|entry| Self::owned_by(entry.value(), kind, user_id))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find(&self, id: i64) -> AppResult<Option<Notification>> {
        Ok(self.rows.get(&id).map(|n| n.value().clone()))
    }

    async fn mark_read(
        &self,
        id: i64,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<bool> {
        match self.rows.get_mut(&id) {
            Some(mut row) if Self::owned_by(&row, kind, user_id) => {
                row.is_read = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_all_read(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.rows.iter_mut() {
            let row = entry.value_mut();
            if Self::owned_by(row, kind, user_id) && !row.is_read {
                row.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn count_unread(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<i64> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| Self::owned_by(entry.value(), kind, user_id) && !entry.value().is_read)
            .count() as i64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
