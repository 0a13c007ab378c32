//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use society_core::AppError;

use super::kind::{AlertStatus, AlertType};
use crate::principal::PrincipalId;

/// An emergency alert raised by a resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Alert {
    /// Unique alert identifier.
    pub id: i64,
    /// Emergency category.
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub alert_type: AlertType,
    /// Free-text description.
    pub message: String,
    /// Unit label supplied by the resident, e.g. `"B-203"`.
    pub unit: String,
    /// The resident who raised it.
    pub resident_id: PrincipalId,
    /// Lifecycle state.
    pub status: AlertStatus,
    /// When the alert was raised.
    pub created_at: DateTime<Utc>,
    /// When the alert was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Alert {
    /// Whether the alert still awaits a response.
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }
}

/// Input for raising an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    /// Emergency category.
    pub alert_type: AlertType,
    /// Free-text description.
    pub message: String,
    /// Unit label.
    pub unit: String,
    /// The resident raising it.
    pub resident_id: PrincipalId,
}

impl NewAlert {
    /// Reject blank message or unit and normalize surrounding whitespace.
    pub fn validate(mut self) -> Result<Self, AppError> {
        self.message = self.message.trim().to_string();
        self.unit = self.unit.trim().to_string();
        if self.message.is_empty() {
            return Err(AppError::validation("Alert message is required"));
        }
        if self.unit.is_empty() {
            return Err(AppError::validation("Alert unit is required"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_rejects_blank() {
        let ok = NewAlert {
            alert_type: AlertType::Fire,
            message: "  smoke in kitchen ".to_string(),
            unit: "B-203".to_string(),
            resident_id: 1,
        }
        .validate()
        .unwrap();
        assert_eq!(ok.message, "smoke in kitchen");

        let blank = NewAlert {
            alert_type: AlertType::Fire,
            message: "   ".to_string(),
            unit: "B-203".to_string(),
            resident_id: 1,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_serializes_type_field() {
        let alert = Alert {
            id: 7,
            alert_type: AlertType::Security,
            message: "gate left open".to_string(),
            unit: "A-101".to_string(),
            resident_id: 3,
            status: AlertStatus::Active,
            created_at: Utc::now(),
            resolved_at: None,
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "security");
        assert_eq!(json["status"], "active");
    }
}
