//! Shared fixtures for service tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use society_auth::JwtEncoder;
use society_core::config::{AuthConfig, RealtimeConfig};
use society_core::error::AppError;
use society_core::result::AppResult;
use society_database::memory::MemoryNotificationStore;
use society_database::{NotificationStore, StoreManager};
use society_entity::{
    FlatKey, NewNotification, Notification, Principal, PrincipalId, PrincipalKind, Recipient, Role,
};
use society_realtime::RealtimeEngine;

use crate::{AlertService, AuthService, NotificationService, RequestContext};

pub const PASSWORD: &str = "correct horse battery";

pub struct Harness {
    pub stores: StoreManager,
    pub engine: RealtimeEngine,
    pub auth: AuthService,
    pub notifications: NotificationService,
    pub alerts: AlertService,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_stores(StoreManager::in_memory())
    }

    pub fn with_stores(stores: StoreManager) -> Self {
        let engine = RealtimeEngine::new(RealtimeConfig::default());
        let auth = AuthService::new(
            stores.principals(),
            Arc::new(JwtEncoder::new(&AuthConfig::default())),
        );
        let notifications = NotificationService::new(
            stores.notifications(),
            stores.principals(),
            engine.router.clone(),
        );
        let alerts = AlertService::new(
            stores.alerts(),
            stores.principals(),
            notifications.clone(),
            engine.router.clone(),
        );
        Self {
            stores,
            engine,
            auth,
            notifications,
            alerts,
        }
    }

    pub async fn seed(&self, role: Role, email: &str) -> Principal {
        let flat = role
            .is_resident()
            .then(|| FlatKey::new("B", "203").unwrap());
        self.auth
            .provision(role, "Test Person", email, PASSWORD, flat)
            .await
            .unwrap()
    }

    /// Register a live connection joined to the principal's role room (if
    /// any) and user room, with the acks drained.
    pub fn connect(&self, principal: &Principal) -> mpsc::Receiver<String> {
        let manager = &self.engine.connections;
        let (handle, mut rx) = manager.register(principal.clone());
        if let Some(room) = principal.role.room() {
            manager.handle_inbound(
                &handle.id,
                &format!(r#"{{"event":"join-role","data":"{room}"}}"#),
            );
            rx.try_recv().unwrap();
        }
        manager.handle_inbound(
            &handle.id,
            &format!(r#"{{"event":"join-user","data":{}}}"#, principal.id),
        );
        rx.try_recv().unwrap();
        rx
    }
}

pub fn ctx(principal: &Principal) -> RequestContext {
    RequestContext::new(principal.clone())
}

/// Every frame currently queued, parsed.
pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

pub fn event_names(frames: &[serde_json::Value]) -> Vec<String> {
    frames
        .iter()
        .map(|f| f["event"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Notification store that refuses inserts for one recipient.
#[derive(Debug)]
pub struct RefusingNotificationStore {
    inner: MemoryNotificationStore,
    refuse: (PrincipalKind, PrincipalId),
}

impl RefusingNotificationStore {
    pub fn new(kind: PrincipalKind, user_id: PrincipalId) -> Self {
        Self {
            inner: MemoryNotificationStore::new(),
            refuse: (kind, user_id),
        }
    }
}

#[async_trait]
impl NotificationStore for RefusingNotificationStore {
    async fn insert(
        &self,
        recipient: Recipient,
        content: &NewNotification,
    ) -> AppResult<Notification> {
        if (recipient.kind(), recipient.user_id) == self.refuse {
            return Err(AppError::upstream("notification store rejected the row"));
        }
        self.inner.insert(recipient, content).await
    }

    async fn list_for_user(
        &self,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<Vec<Notification>> {
        self.inner.list_for_user(kind, user_id).await
    }

    async fn find(&self, id: i64) -> AppResult<Option<Notification>> {
        self.inner.find(id).await
    }

    async fn mark_read(
        &self,
        id: i64,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<bool> {
        self.inner.mark_read(id, kind, user_id).await
    }

    async fn mark_all_read(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<u64> {
        self.inner.mark_all_read(kind, user_id).await
    }

    async fn count_unread(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<i64> {
        self.inner.count_unread(kind, user_id).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
