//! REST client for the recovery path.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use society_entity::{Alert, AlertStatus, AlertType, Notification, Principal, Role};

use crate::error::ClientError;

/// A logged-in session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Signed token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The logged-in principal.
    pub principal: Principal,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DataBody<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AlertBody {
    alert: Alert,
}

#[derive(Debug, Deserialize)]
struct CountBody {
    count: i64,
}

/// Thin typed wrapper over the society hub REST API.
///
/// Holds the bearer token. Any 401 clears it; a 403 leaves it in place.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Client for a server at `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Use an existing token.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    /// The held token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = token;
    }

    /// Forget the held token.
    pub fn clear_token(&self) {
        self.set_token(None);
    }

    /// Live channel URL carrying the token as a query parameter.
    pub fn live_url(&self) -> Result<String, ClientError> {
        let token = self.token().ok_or(ClientError::NotLoggedIn)?;
        let base = if let Some(rest) = self.base_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.base_url.clone()
        };
        Ok(format!("{base}/ws?token={token}"))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token().ok_or(ClientError::NotLoggedIn)?;
        Ok(self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token))
    }

    async fn check(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: ErrorBody = response.json().await.unwrap_or(ErrorBody {
            error: String::new(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
        });

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!(message = %body.message, "Credential rejected, discarding token");
                self.clear_token();
                Err(ClientError::Unauthenticated(body.message))
            }
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(body.message)),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                code: body.error,
                message: body.message,
            }),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Exchange credentials for a token and keep it.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<Session, ClientError> {
        let builder = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password, "role": role }));
        let session: Session = self.send_json(builder).await?;
        self.set_token(Some(session.token.clone()));
        debug!(user_id = session.principal.id, role = %session.principal.role, "Logged in");
        Ok(session)
    }

    /// The principal the held token resolves to.
    pub async fn me(&self) -> Result<Principal, ClientError> {
        self.send_json(self.request(Method::GET, "/api/auth/me")?).await
    }

    /// The caller's notifications, newest first.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.send_json(self.request(Method::GET, "/api/notifications")?).await
    }

    /// The caller's unread count.
    pub async fn unread_count(&self) -> Result<i64, ClientError> {
        let body: CountBody = self
            .send_json(self.request(Method::GET, "/api/notifications/unread-count")?)
            .await?;
        Ok(body.count)
    }

    /// Mark one notification read.
    pub async fn mark_read(&self, id: i64) -> Result<(), ClientError> {
        let path = format!("/api/notifications/{id}/read");
        self.check(self.request(Method::PUT, &path)?.send().await?).await?;
        Ok(())
    }

    /// Mark every notification read.
    pub async fn mark_all_read(&self) -> Result<(), ClientError> {
        self.check(self.request(Method::PUT, "/api/notifications/read/all")?.send().await?)
            .await?;
        Ok(())
    }

    /// Alerts newest first, optionally filtered.
    pub async fn alerts(&self, status: Option<AlertStatus>) -> Result<Vec<Alert>, ClientError> {
        let path = match status {
            Some(status) => format!("/api/alerts?status={status}"),
            None => "/api/alerts".to_string(),
        };
        let builder = self.request(Method::GET, &path)?;
        let body: DataBody<Vec<Alert>> = self.send_json(builder).await?;
        Ok(body.data)
    }

    /// Raise an alert.
    pub async fn raise_alert(
        &self,
        alert_type: AlertType,
        message: &str,
        unit: &str,
    ) -> Result<Alert, ClientError> {
        let builder = self
            .request(Method::POST, "/api/alerts")?
            .json(&json!({ "type": alert_type, "message": message, "unit": unit }));
        let body: AlertBody = self.send_json(builder).await?;
        Ok(body.alert)
    }

    /// Resolve an alert.
    pub async fn resolve_alert(&self, id: i64) -> Result<(), ClientError> {
        let path = format!("/api/alerts/{id}/resolve");
        self.check(self.request(Method::PUT, &path)?.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_url_follows_scheme() {
        let api = ApiClient::new("http://localhost:5000/").with_token("abc");
        assert_eq!(api.live_url().unwrap(), "ws://localhost:5000/ws?token=abc");

        let api = ApiClient::new("https://hub.example.com").with_token("abc");
        assert_eq!(api.live_url().unwrap(), "wss://hub.example.com/ws?token=abc");
    }

    #[test]
    fn test_live_url_needs_token() {
        let api = ApiClient::new("http://localhost:5000");
        assert!(matches!(api.live_url(), Err(ClientError::NotLoggedIn)));
    }

    #[test]
    fn test_clear_token() {
        let api = ApiClient::new("http://localhost:5000").with_token("abc");
        api.clear_token();
        assert!(api.token().is_none());
    }
}
