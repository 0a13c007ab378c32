//! Notification repository implementation.
//!
//! Notifications keep their free-form payload in a JSONB column and may live
//! in a separate database from principals and alerts.

use async_trait::async_trait;
use sqlx::PgPool;

use society_core::result::AppResult;
use society_entity::{NewNotification, Notification, PrincipalId, PrincipalKind, Recipient};

use crate::error::db_error;
use crate::store::NotificationStore;

const NOTIFICATION_COLUMNS: &str = "id, user_id, recipient_kind, recipient_role, type, title, \
     message, data, is_read, created_at";

/// PostgreSQL notification store.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new notification store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(
        &self,
        recipient: Recipient,
        content: &NewNotification,
    ) -> AppResult<Notification> {
        let sql = format!(
            "INSERT INTO notifications (user_id, recipient_kind, recipient_role, type, title, message, data) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&sql)
            .bind(recipient.user_id)
            .bind(recipient.kind())
            .bind(recipient.role.as_str())
            .bind(&content.kind)
            .bind(&content.title)
            .bind(&content.message)
            .bind(&content.data)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create notification", e))
    }

    async fn list_for_user(
        &self,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE recipient_kind = $1 AND user_id = $2 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Notification>(&sql)
            .bind(kind)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list notifications", e))
    }

    async fn find(&self, id: i64) -> AppResult<Option<Notification>> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch notification", e))
    }

    async fn mark_read(
        &self,
        id: i64,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE id = $1 AND recipient_kind = $2 AND user_id = $3",
        )
        .bind(id)
        .bind(kind)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark notification read", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE \
             WHERE recipient_kind = $1 AND user_id = $2 AND is_read = FALSE",
        )
        .bind(kind)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark all notifications read", e))?;
        Ok(result.rows_affected())
    }

    async fn count_unread(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_kind = $1 AND user_id = $2 AND is_read = FALSE",
        )
        .bind(kind)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to count unread notifications", e))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| db_error("Health check failed", e))
    }
}
