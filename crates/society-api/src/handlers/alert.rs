//! Alert handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use society_core::error::AppError;
use society_entity::{Alert, AlertStatus, AlertType};

use crate::dto::request::{AlertListQuery, CreateAlertRequest, validated};
use crate::dto::response::{AlertResponse, DataResponse, IdResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/alerts
pub async fn create_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<AlertResponse>)> {
    let req = validated(req)?;
    let alert_type: AlertType = req.alert_type.parse()?;

    let alert = state
        .alert_service
        .create_alert(&auth, alert_type, req.message, req.unit)
        .await?;

    Ok((StatusCode::CREATED, Json(AlertResponse { alert })))
}

/// GET /api/alerts?status=
pub async fn list_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AlertListQuery>,
) -> ApiResult<Json<DataResponse<Vec<Alert>>>> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<AlertStatus>()?),
    };

    let data = state.alert_service.list_alerts(&auth, status).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/alerts/{id}
pub async fn get_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<AlertResponse>> {
    let alert = state.alert_service.find_alert(&auth, id).await?;
    Ok(Json(AlertResponse { alert }))
}

/// PUT /api/alerts/{id}/resolve
pub async fn resolve_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<IdResponse>> {
    let affected = state.alert_service.resolve_alert(&auth, id).await?;
    if affected == 0 {
        return Err(AppError::not_found(format!("Alert {id} not found or already resolved")).into());
    }
    Ok(Json(IdResponse { id }))
}
