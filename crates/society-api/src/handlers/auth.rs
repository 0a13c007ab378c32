//! Auth handlers: login, logout, me.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use society_entity::{Principal, Role};

use crate::dto::request::{LoginRequest, validated};
use crate::dto::response::{LoginResponse, SuccessResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let req = validated(req)?;
    let role: Role = req.role.parse()?;

    let result = state
        .auth_service
        .login(&req.email, &req.password, role)
        .await?;

    let cookie = Cookie::build((state.config.auth.cookie_name.clone(), result.token.token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.config.auth.secure_cookie)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: result.token.token,
            expires_at: result.token.expires_at,
            principal: result.principal,
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessResponse>) {
    // Always emitted, even when the request carried no cookie.
    let mut cookie = Cookie::build(state.config.auth.cookie_name.clone())
        .path("/")
        .http_only(true)
        .secure(state.config.auth.secure_cookie)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    (jar.add(cookie), Json(SuccessResponse::ok()))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> Json<Principal> {
    Json(state.auth_service.me(&auth))
}
