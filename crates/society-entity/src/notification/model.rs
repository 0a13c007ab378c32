//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use society_core::AppError;

use crate::principal::{PrincipalId, PrincipalKind, Role};

/// Type tag of notifications materialized for a new alert.
pub const ALERT_KIND: &str = "alert";

/// A per-recipient informational notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: i64,
    /// The recipient's id within its own table.
    pub user_id: PrincipalId,
    /// Table the recipient id refers to.
    pub recipient_kind: PrincipalKind,
    /// Recipient role at creation time, e.g. `"Admin"`.
    pub recipient_role: String,
    /// Type tag, e.g. `"alert"` or `"visitor"`.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    /// Title line.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Opaque structured payload.
    pub data: serde_json::Value,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Notification content shared by every recipient of a fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Title line.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Opaque structured payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl NewNotification {
    /// Reject blank type, title, or message.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.kind.trim().is_empty() {
            return Err(AppError::validation("Notification type is required"));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Notification title is required"));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::validation("Notification message is required"));
        }
        Ok(())
    }
}

/// One fan-out target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient {
    /// Recipient id.
    pub user_id: PrincipalId,
    /// Recipient role at creation time.
    pub role: Role,
}

impl Recipient {
    /// Build a recipient.
    pub fn new(user_id: PrincipalId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Table the recipient id refers to.
    pub fn kind(&self) -> PrincipalKind {
        self.role.kind()
    }
}
