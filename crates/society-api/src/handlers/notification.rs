//! Notification handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use society_entity::{NewNotification, Notification};

use crate::dto::request::{NotifyAdminsRequest, validated};
use crate::dto::response::{CountResponse, FanoutResponse, SuccessResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state.notification_service.list_for_user(&auth).await?;
    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CountResponse>> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/notifications/{id}
pub async fn get_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Notification>> {
    let notification = state.notification_service.find(&auth, id).await?;
    Ok(Json(notification))
}

/// POST /api/notifications/admin
pub async fn notify_admins(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NotifyAdminsRequest>,
) -> ApiResult<(StatusCode, Json<FanoutResponse>)> {
    let req = validated(req)?;
    let content = NewNotification {
        kind: req.kind,
        title: req.title,
        message: req.message,
        data: req.data,
    };

    let report = state
        .notification_service
        .notify_admins(&auth, content)
        .await?;

    Ok((StatusCode::CREATED, Json(report.into())))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<SuccessResponse>> {
    state.notification_service.mark_read(&auth, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// PUT /api/notifications/read/all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SuccessResponse>> {
    let updated = state.notification_service.mark_all_read(&auth).await?;
    Ok(Json(SuccessResponse {
        success: true,
        updated: Some(updated),
    }))
}
