//! Integration tests for live channel authentication, rooms, and health.

mod helpers;

use axum::http::StatusCode;

use society_entity::{ResidentRole, Role};

use helpers::{TestApp, drain, event_names};

#[tokio::test]
async fn test_ws_upgrade_without_upgrade_headers() {
    let app = TestApp::new();

    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_ws_authenticator_uses_rest_resolver() {
    let app = TestApp::new();
    let (guard, token) = app.seed_and_login(Role::Guard, "guard@example.com").await;
    let authenticator = &app.state.ws_authenticator;

    assert!(authenticator.authenticate(None).await.is_err());
    assert!(authenticator.authenticate(Some("garbage")).await.is_err());

    let resolved = authenticator.authenticate(Some(&token)).await.unwrap();
    assert_eq!(resolved.id, guard.id);
    assert_eq!(resolved.role, Role::Guard);
}

#[tokio::test]
async fn test_resident_cannot_join_staff_room() {
    let app = TestApp::new();
    let resident = app
        .seed(Role::Resident(ResidentRole::Owner), "owner@example.com")
        .await;
    let manager = &app.state.realtime.connections;
    let (handle, mut rx) = manager.register(resident);

    manager.handle_inbound(&handle.id, r#"{"event":"join-role","data":"admins"}"#);

    let frames = drain(&mut rx);
    assert_eq!(event_names(&frames), vec!["error"]);
    assert_eq!(frames[0]["data"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_cannot_join_another_users_room() {
    let app = TestApp::new();
    let admin = app.seed(Role::Admin, "admin@example.com").await;
    let manager = &app.state.realtime.connections;
    let (handle, mut rx) = manager.register(admin.clone());

    manager.handle_inbound(
        &handle.id,
        &format!(r#"{{"event":"join-user","data":{}}}"#, admin.id + 1),
    );
    let frames = drain(&mut rx);
    assert_eq!(frames[0]["data"]["code"], "FORBIDDEN");

    manager.handle_inbound(&handle.id, r#"{"event":"join-role","data":"Admin"}"#);
    let frames = drain(&mut rx);
    assert_eq!(event_names(&frames), vec!["joined"]);
    assert_eq!(frames[0]["data"]["room"], "admins");
}

#[tokio::test]
async fn test_malformed_frame_gets_error_event() {
    let app = TestApp::new();
    let admin = app.seed(Role::Admin, "admin@example.com").await;
    let manager = &app.state.realtime.connections;
    let (handle, mut rx) = manager.register(admin);

    manager.handle_inbound(&handle.id, "not json");

    let frames = drain(&mut rx);
    assert_eq!(event_names(&frames), vec!["error"]);
    assert_eq!(frames[0]["data"]["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn test_health_reports_connections() {
    let app = TestApp::new();
    let admin = app.seed(Role::Admin, "admin@example.com").await;
    let _rx = app.connect(&admin);

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["stores"], "connected");
    assert_eq!(response.body["connections"], 1);
    assert_eq!(response.body["principals_online"], 1);
}
