//! Alert type and status enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use society_core::AppError;

/// Emergency category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Fire or smoke.
    Fire,
    /// Intrusion, theft, or other security threat.
    Security,
    /// Medical emergency.
    Medical,
}

impl AlertType {
    /// Return the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Security => "security",
            Self::Medical => "medical",
        }
    }

    /// Capitalized name for titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fire => "Fire",
            Self::Security => "Security",
            Self::Medical => "Medical",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(Self::Fire),
            "security" => Ok(Self::Security),
            "medical" => Ok(Self::Medical),
            _ => Err(AppError::validation(format!(
                "Invalid alert type: '{s}'. Expected one of: fire, security, medical"
            ))),
        }
    }
}

/// Lifecycle state of an alert. The only transition is `Active -> Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Raised and awaiting response.
    Active,
    /// Handled by an admin or guard. Terminal.
    Resolved,
}

impl AlertStatus {
    /// Return the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            _ => Err(AppError::validation(format!(
                "Invalid alert status: '{s}'. Expected one of: active, resolved"
            ))),
        }
    }
}
