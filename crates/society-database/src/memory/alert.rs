//! In-memory alert store.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use society_core::result::AppResult;
use society_entity::{Alert, AlertStatus, NewAlert};

use crate::store::AlertStore;

/// Alert store held in a `DashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAlertStore {
    alerts: Arc<DashMap<i64, Alert>>,
    sequence: Arc<AtomicI64>,
}

impl MemoryAlertStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn create(&self, alert: NewAlert) -> AppResult<Alert> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let alert = Alert {
            id,
            alert_type: alert.alert_type,
            message: alert.message,
            unit: alert.unit,
            resident_id: alert.resident_id,
            status: AlertStatus::Active,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.alerts.insert(id, alert.clone());
        Ok(alert)
    }

    async fn list(&self, status: Option<AlertStatus>) -> AppResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| status.is_none_or(|s| entry.value().status == s))
            .map(|entry| entry.value().clone())
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(alerts)
    }

    async fn find(&self, id: i64) -> AppResult<Option<Alert>> {
        Ok(self.alerts.get(&id).map(|a| a.value().clone()))
    }

    async fn resolve(&self, id: i64) -> AppResult<u64> {
        // The entry guard holds the shard lock, so check-and-set is atomic.
        match self.alerts.get_mut(&id) {
            Some(mut alert) if alert.status == AlertStatus::Active => {
                alert.status = AlertStatus::Resolved;
                alert.resolved_at = Some(Utc::now());
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
