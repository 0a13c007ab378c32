//! Route definitions for the society hub HTTP API.
//!
//! REST routes are mounted under `/api`; the live channel upgrade lives at
//! `/ws` and the health probe at `/health`.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, without the outer middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(alert_routes())
        .merge(notification_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .route("/health", get(handlers::health::health))
        .with_state(state)
}

/// Auth endpoints: login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Alert raise, list, resolve
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/alerts",
            post(handlers::alert::create_alert).get(handlers::alert::list_alerts),
        )
        .route("/alerts/{id}", get(handlers::alert::get_alert))
        .route("/alerts/{id}/resolve", put(handlers::alert::resolve_alert))
}

/// Notification history and read state
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/admin",
            post(handlers::notification::notify_admins),
        )
        .route(
            "/notifications/read/all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}",
            get(handlers::notification::get_notification),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}
