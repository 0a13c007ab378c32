//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use society_auth::{IdentityResolver, JwtEncoder};
use society_core::config::AppConfig;
use society_database::StoreManager;
use society_realtime::RealtimeEngine;
use society_realtime::connection::WsAuthenticator;
use society_service::{AlertService, AuthService, NotificationService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Principal, alert, and notification stores
    pub stores: StoreManager,
    /// Live channel engine
    pub realtime: RealtimeEngine,

    // ── Auth ─────────────────────────────────────────────────
    /// Bearer/cookie credential resolver
    pub resolver: Arc<IdentityResolver>,
    /// Live channel upgrade authenticator
    pub ws_authenticator: WsAuthenticator,

    // ── Services ─────────────────────────────────────────────
    /// Login service
    pub auth_service: Arc<AuthService>,
    /// Alert service
    pub alert_service: Arc<AlertService>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire services over the given stores.
    pub fn new(config: AppConfig, stores: StoreManager) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone());

        let resolver = IdentityResolver::new(&config.auth, stores.principals());
        let ws_authenticator = WsAuthenticator::new(resolver.clone());
        let encoder = Arc::new(JwtEncoder::new(&config.auth));

        let notification_service = NotificationService::new(
            stores.notifications(),
            stores.principals(),
            realtime.router.clone(),
        );
        let alert_service = AlertService::new(
            stores.alerts(),
            stores.principals(),
            notification_service.clone(),
            realtime.router.clone(),
        );
        let auth_service = AuthService::new(stores.principals(), encoder);

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            stores,
            realtime,
            resolver: Arc::new(resolver),
            ws_authenticator,
            auth_service: Arc::new(auth_service),
            alert_service: Arc::new(alert_service),
            notification_service: Arc::new(notification_service),
        }
    }
}
