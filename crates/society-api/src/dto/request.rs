//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use society_core::error::AppError;

/// Validate a request body, mapping failures to a single validation error.
pub fn validated<T: Validate>(req: T) -> Result<T, AppError> {
    req.validate().map_err(describe)?;
    Ok(req)
}

fn describe(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{field}: {message}")
        })
        .collect();
    fields.sort();
    AppError::validation(fields.join("; "))
}

/// `POST /api/alerts` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAlertRequest {
    /// `fire`, `security`, or `medical`.
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, message = "is required"))]
    pub alert_type: String,
    /// Description.
    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "is required"))]
    pub message: String,
    /// Unit label, e.g. `B-203`.
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "is required"))]
    pub unit: String,
}

/// `GET /api/alerts` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertListQuery {
    /// `active` or `resolved`. Absent or empty lists everything.
    pub status: Option<String>,
}

/// `POST /api/notifications/admin` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotifyAdminsRequest {
    /// Type tag.
    #[serde(rename = "type", default)]
    #[validate(length(min = 1, max = 64, message = "is required"))]
    pub kind: String,
    /// Title line.
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "is required"))]
    pub title: String,
    /// Body text.
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub message: String,
    /// Opaque payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "must be an email address"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    /// `Admin`, `Guard`, `Owner`, `Tenant`, or `Family Member`.
    #[validate(length(min = 1, message = "is required"))]
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_alert_fields_are_reported() {
        let req: CreateAlertRequest = serde_json::from_str(r#"{"type":"fire"}"#).unwrap();
        let err = validated(req).unwrap_err();
        assert!(err.message.contains("message"));
        assert!(err.message.contains("unit"));
    }

    #[test]
    fn test_login_requires_email_shape() {
        let req = LoginRequest {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
            role: "Admin".to_string(),
        };
        assert!(validated(req).is_err());
    }
}
