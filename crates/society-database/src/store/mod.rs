//! Store traits.
//!
//! Every mutation is a single atomic statement against its store. Fan-out
//! rows are independent, so no operation here spans more than one row
//! except the bulk mark-all-read.

use async_trait::async_trait;

use society_core::result::AppResult;
use society_entity::{
    Alert, AlertStatus, NewAlert, NewNotification, NewPrincipal, Notification, PrincipalId,
    PrincipalKind, PrincipalRecord, Recipient,
};

/// Read access to the three disjoint principal tables.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Look a principal up by id in the table for `kind`.
    async fn find_by_id(
        &self,
        kind: PrincipalKind,
        id: PrincipalId,
    ) -> AppResult<Option<PrincipalRecord>>;

    /// Look a principal up by login email in the table for `kind`.
    async fn find_by_email(
        &self,
        kind: PrincipalKind,
        email: &str,
    ) -> AppResult<Option<PrincipalRecord>>;

    /// All principal ids in the table for `kind`, ascending.
    async fn list_ids(&self, kind: PrincipalKind) -> AppResult<Vec<PrincipalId>>;

    /// Insert a principal into the table its role selects.
    async fn insert(&self, principal: NewPrincipal) -> AppResult<PrincipalRecord>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Durable alert history.
#[async_trait]
pub trait AlertStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new active alert, assigning id and timestamp.
    async fn create(&self, alert: NewAlert) -> AppResult<Alert>;

    /// Alerts newest-first, optionally filtered by status.
    async fn list(&self, status: Option<AlertStatus>) -> AppResult<Vec<Alert>>;

    /// Fetch one alert.
    async fn find(&self, id: i64) -> AppResult<Option<Alert>>;

    /// Transition an active alert to resolved. Returns the affected count:
    /// `0` when the alert is absent or already resolved, `1` otherwise.
    async fn resolve(&self, id: i64) -> AppResult<u64>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Durable per-recipient notification history.
///
/// Recipients are addressed by `(kind, user_id)` since ids are only unique
/// within one principal table.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert one row for one recipient.
    async fn insert(
        &self,
        recipient: Recipient,
        content: &NewNotification,
    ) -> AppResult<Notification>;

    /// A recipient's notifications newest-first.
    async fn list_for_user(
        &self,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<Vec<Notification>>;

    /// Fetch one notification.
    async fn find(&self, id: i64) -> AppResult<Option<Notification>>;

    /// Set `is_read` on a notification owned by the recipient. Returns
    /// `false` when no such notification belongs to them.
    async fn mark_read(
        &self,
        id: i64,
        kind: PrincipalKind,
        user_id: PrincipalId,
    ) -> AppResult<bool>;

    /// Set `is_read` on all of a recipient's notifications. Returns how many
    /// were unread before.
    async fn mark_all_read(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<u64>;

    /// Count a recipient's unread notifications.
    async fn count_unread(&self, kind: PrincipalKind, user_id: PrincipalId) -> AppResult<i64>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}
