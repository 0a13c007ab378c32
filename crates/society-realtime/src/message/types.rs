//! Inbound and outbound live channel events.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use serde::{Deserialize, Serialize};

use society_core::error::AppError;
use society_entity::{Alert, Notification, PrincipalId};

/// Events sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Join a role room. Payload is a role name such as `"admins"` or `"Guard"`.
    JoinRole(String),
    /// Join the caller's user room.
    JoinUser(PrincipalId),
    /// Heartbeat reply.
    Pong,
}

#[derive(Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl InboundEvent {
    /// Parse a raw text frame.
    ///
    /// `join-user` accepts the id as a number or a numeric string.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let frame: RawFrame = serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Malformed frame: {e}")))?;

        match frame.event.as_str() {
            "join-role" => match frame.data {
                serde_json::Value::String(role) => Ok(Self::JoinRole(role)),
                _ => Err(AppError::validation("join-role expects a role name string")),
            },
            "join-user" => {
                let id = match &frame.data {
                    serde_json::Value::Number(n) => n.as_i64(),
                    serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                id.map(Self::JoinUser)
                    .ok_or_else(|| AppError::validation("join-user expects a numeric user id"))
            }
            "pong" => Ok(Self::Pong),
            other => Err(AppError::validation(format!("Unknown event: '{other}'"))),
        }
    }
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    /// A freshly raised alert.
    NewAlert(Alert),
    /// An alert moved to resolved.
    AlertResolved {
        /// Alert id.
        id: i64,
    },
    /// A notification for the receiving principal. Always unread on delivery.
    Notification(Notification),
    /// One notification was marked read.
    NotificationRead {
        /// Notification id.
        id: i64,
    },
    /// All of a principal's notifications were marked read.
    NotificationsReadAll {
        /// Principal id.
        user_id: PrincipalId,
    },
    /// Room join acknowledged.
    Joined {
        /// Room name.
        room: String,
    },
    /// Server keepalive.
    Ping {
        /// Server time, milliseconds since epoch.
        timestamp: i64,
    },
    /// A rejected client frame.
    Error {
        /// Machine-readable code.
        code: String,
        /// Description.
        message: String,
    },
}

impl OutboundEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewAlert(_) => "new-alert",
            Self::AlertResolved { .. } => "alert-resolved",
            Self::Notification(_) => "notification",
            Self::NotificationRead { .. } => "notification-read",
            Self::NotificationsReadAll { .. } => "notifications-read-all",
            Self::Joined { .. } => "joined",
            Self::Ping { .. } => "ping",
            Self::Error { .. } => "error",
        }
    }

    /// Build a notification delivery, forcing the unread flag.
    pub fn notification(mut notification: Notification) -> Self {
        notification.is_read = false;
        Self::Notification(notification)
    }

    /// Build an error frame.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Serialize to a text frame.
    pub fn to_frame(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }
}
