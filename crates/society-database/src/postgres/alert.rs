//! Alert repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use society_core::result::AppResult;
use society_entity::{Alert, AlertStatus, NewAlert};

use crate::error::db_error;
use crate::store::AlertStore;

const ALERT_COLUMNS: &str =
    "id, type, message, unit, resident_id, status, created_at, resolved_at";

/// PostgreSQL alert store.
#[derive(Debug, Clone)]
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    /// Create a new alert store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn create(&self, alert: NewAlert) -> AppResult<Alert> {
        let sql = format!(
            "INSERT INTO alerts (type, message, unit, resident_id) \
             VALUES ($1, $2, $3, $4) RETURNING {ALERT_COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&sql)
            .bind(alert.alert_type)
            .bind(&alert.message)
            .bind(&alert.unit)
            .bind(alert.resident_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to create alert", e))
    }

    async fn list(&self, status: Option<AlertStatus>) -> AppResult<Vec<Alert>> {
        let sql = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts \
             WHERE ($1::alert_status IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Alert>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list alerts", e))
    }

    async fn find(&self, id: i64) -> AppResult<Option<Alert>> {
        let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch alert", e))
    }

    async fn resolve(&self, id: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE alerts SET status = 'resolved', resolved_at = NOW() \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to resolve alert", e))?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| db_error("Health check failed", e))
    }
}
