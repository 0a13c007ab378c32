//! Integration tests for login, logout, and credential resolution.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use society_entity::{ResidentRole, Role};

use helpers::{PASSWORD, TestApp};

const TENANT: Role = Role::Resident(ResidentRole::Tenant);

#[tokio::test]
async fn test_login_success_sets_cookie() {
    let app = TestApp::new();
    app.seed(TENANT, "tenant@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "tenant@example.com",
                "password": PASSWORD,
                "role": "Tenant",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["token"].as_str().is_some());
    assert_eq!(response.body["principal"]["role"], "Tenant");
    assert_eq!(response.body["principal"]["flat"], "B-203");

    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new();
    app.seed(Role::Admin, "admin@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "admin@example.com",
                "password": "wrongpassword",
                "role": "Admin",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_with_another_tables_role_is_rejected() {
    let app = TestApp::new();
    app.seed(Role::Guard, "guard@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "guard@example.com",
                "password": PASSWORD,
                "role": "Admin",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_wrong_resident_refinement_is_rejected() {
    let app = TestApp::new();
    app.seed(TENANT, "tenant@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "tenant@example.com",
                "password": PASSWORD,
                "role": "Owner",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_unknown_role_and_blank_fields() {
    let app = TestApp::new();

    let unknown_role = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "x@example.com",
                "password": PASSWORD,
                "role": "Resident",
            })),
            None,
        )
        .await;
    assert_eq!(unknown_role.status, StatusCode::BAD_REQUEST);

    let blank = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "email": "", "password": "", "role": "Admin" })),
            None,
        )
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = TestApp::new();
    let (admin, token) = app.seed_and_login(Role::Admin, "admin@example.com").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"], admin.id);
    assert_eq!(response.body["role"], "Admin");
    assert_eq!(response.body["email"], "admin@example.com");
}

#[tokio::test]
async fn test_me_with_cookie_only() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(Role::Guard, "guard@example.com").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header(header::COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "Guard");
}

#[tokio::test]
async fn test_me_without_credential() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_principal_is_rejected() {
    let app = TestApp::new();
    let encoder = society_auth::JwtEncoder::new(&app.state.config.auth);
    let issued = encoder.issue(999, Role::Admin, "ghost@example.com").unwrap();

    let response = app
        .request("GET", "/api/auth/me", None, Some(&issued.token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/auth/logout", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_logout_with_cookie_expires_it() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(Role::Guard, "gate@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, format!("token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    let cookies: Vec<&str> = response
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("token=;"));
    assert!(cookies[0].contains("Max-Age=0"));
}
