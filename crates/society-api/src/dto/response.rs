//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use society_entity::{Alert, Notification, Principal};
use society_service::{FanoutReport, RecipientFailure};

/// `{ "alert": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    /// The alert.
    pub alert: Alert,
}

/// `{ "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    /// Payload.
    pub data: T,
}

/// `{ "id": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdResponse {
    /// Affected id.
    pub id: i64,
}

/// `{ "success": true }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always true.
    pub success: bool,
    /// Rows changed, for bulk operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<u64>,
}

impl SuccessResponse {
    /// Plain success.
    pub fn ok() -> Self {
        Self {
            success: true,
            updated: None,
        }
    }
}

/// Unread counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// Count.
    pub count: i64,
}

/// Per-recipient result of a fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct FanoutResponse {
    /// Whether every recipient got a row.
    pub success: bool,
    /// Rows written.
    pub notifications: Vec<Notification>,
    /// Recipients whose row failed.
    pub failed: Vec<RecipientFailure>,
}

impl From<FanoutReport> for FanoutResponse {
    fn from(report: FanoutReport) -> Self {
        Self {
            success: report.is_complete(),
            notifications: report.delivered,
            failed: report.failed,
        }
    }
}

/// Login result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The logged-in principal.
    pub principal: Principal,
}

/// Health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since start.
    pub uptime_seconds: u64,
    /// Store reachability.
    pub stores: String,
    /// Open live connections.
    pub connections: usize,
    /// Distinct principals connected.
    pub principals_online: usize,
}
