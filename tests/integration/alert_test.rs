//! Integration tests for raising, listing, and resolving alerts.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use society_entity::{ResidentRole, Role};

use helpers::{TestApp, drain, event_names};

const OWNER: Role = Role::Resident(ResidentRole::Owner);

fn fire_alert() -> serde_json::Value {
    json!({ "type": "fire", "message": "Smoke in the stairwell", "unit": "B-203" })
}

#[tokio::test]
async fn test_resident_raises_alert() {
    let app = TestApp::new();
    let (resident, token) = app.seed_and_login(OWNER, "owner@example.com").await;

    let response = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let alert = &response.body["alert"];
    assert_eq!(alert["type"], "fire");
    assert_eq!(alert["status"], "active");
    assert_eq!(alert["unit"], "B-203");
    assert_eq!(alert["resident_id"], resident.id);
}

#[tokio::test]
async fn test_staff_cannot_raise_alerts() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(Role::Guard, "guard@example.com").await;

    let response = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_raise_without_token_is_unauthenticated() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/alerts", Some(fire_alert()), None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_raise_rejects_bad_input() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(OWNER, "owner@example.com").await;

    let bad_type = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({ "type": "flood", "message": "Water", "unit": "B-203" })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);

    let no_message = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({ "type": "medical", "message": "", "unit": "B-203" })),
            Some(&token),
        )
        .await;
    assert_eq!(no_message.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_alert_is_pushed_to_staff_rooms_only() {
    let app = TestApp::new();
    let (resident, token) = app.seed_and_login(OWNER, "owner@example.com").await;
    let admin = app.seed(Role::Admin, "admin@example.com").await;
    let guard = app.seed(Role::Guard, "guard@example.com").await;

    let mut admin_rx = app.connect(&admin);
    let mut guard_rx = app.connect(&guard);
    let mut resident_rx = app.connect(&resident);

    let response = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&token))
        .await;
    let alert_id = response.body["alert"]["id"].clone();

    for rx in [&mut admin_rx, &mut guard_rx] {
        let frames = drain(rx);
        let names = event_names(&frames);
        assert!(names.contains(&"new-alert"), "got {names:?}");
        assert!(names.contains(&"notification"), "got {names:?}");
        let pushed = frames.iter().find(|f| f["event"] == "new-alert").unwrap();
        assert_eq!(pushed["data"]["id"], alert_id);
    }
    assert!(drain(&mut resident_rx).is_empty());
}

#[tokio::test]
async fn test_alert_creates_durable_staff_notifications() {
    let app = TestApp::new();
    let (_, resident_token) = app.seed_and_login(OWNER, "owner@example.com").await;
    let (_, admin_token) = app.seed_and_login(Role::Admin, "admin@example.com").await;
    let (_, guard_token) = app.seed_and_login(Role::Guard, "guard@example.com").await;

    app.request("POST", "/api/alerts", Some(fire_alert()), Some(&resident_token))
        .await;

    for token in [&admin_token, &guard_token] {
        let response = app
            .request("GET", "/api/notifications", None, Some(token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        let list = response.body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["type"], "alert");
        assert_eq!(list[0]["title"], "Fire alert in B-203");
        assert_eq!(list[0]["is_read"], false);
    }

    let resident_view = app
        .request("GET", "/api/notifications", None, Some(&resident_token))
        .await;
    assert!(resident_view.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_alerts_is_staff_only() {
    let app = TestApp::new();
    let (_, resident_token) = app.seed_and_login(OWNER, "owner@example.com").await;
    let (_, admin_token) = app.seed_and_login(Role::Admin, "admin@example.com").await;

    app.request("POST", "/api/alerts", Some(fire_alert()), Some(&resident_token))
        .await;

    let staff = app
        .request("GET", "/api/alerts", None, Some(&admin_token))
        .await;
    assert_eq!(staff.status, StatusCode::OK);
    assert_eq!(staff.body["data"].as_array().unwrap().len(), 1);

    let resident = app
        .request("GET", "/api/alerts", None, Some(&resident_token))
        .await;
    assert_eq!(resident.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_status_filter() {
    let app = TestApp::new();
    let (_, resident_token) = app.seed_and_login(OWNER, "owner@example.com").await;
    let (_, guard_token) = app.seed_and_login(Role::Guard, "guard@example.com").await;

    let first = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&resident_token))
        .await;
    app.request("POST", "/api/alerts", Some(fire_alert()), Some(&resident_token))
        .await;
    let first_id = first.body["alert"]["id"].as_i64().unwrap();

    app.request(
        "PUT",
        &format!("/api/alerts/{first_id}/resolve"),
        None,
        Some(&guard_token),
    )
    .await;

    let resolved = app
        .request("GET", "/api/alerts?status=resolved", None, Some(&guard_token))
        .await;
    let resolved = resolved.body["data"].as_array().unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["id"], first_id);
    assert!(resolved[0]["resolved_at"].is_string());

    let active = app
        .request("GET", "/api/alerts?status=active", None, Some(&guard_token))
        .await;
    assert_eq!(active.body["data"].as_array().unwrap().len(), 1);

    let bogus = app
        .request("GET", "/api/alerts?status=closed", None, Some(&guard_token))
        .await;
    assert_eq!(bogus.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_publishes_once_and_second_resolve_is_not_found() {
    let app = TestApp::new();
    let (_, resident_token) = app.seed_and_login(OWNER, "owner@example.com").await;
    let admin = app.seed(Role::Admin, "admin@example.com").await;
    let (_, guard_token) = app.seed_and_login(Role::Guard, "guard@example.com").await;

    let created = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&resident_token))
        .await;
    let id = created.body["alert"]["id"].as_i64().unwrap();

    let mut admin_rx = app.connect(&admin);

    let first = app
        .request("PUT", &format!("/api/alerts/{id}/resolve"), None, Some(&guard_token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["id"], id);

    let frames = drain(&mut admin_rx);
    assert_eq!(event_names(&frames), vec!["alert-resolved"]);
    assert_eq!(frames[0]["data"]["id"], id);

    let second = app
        .request("PUT", &format!("/api/alerts/{id}/resolve"), None, Some(&guard_token))
        .await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert!(drain(&mut admin_rx).is_empty());
}

#[tokio::test]
async fn test_resident_cannot_resolve() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(OWNER, "owner@example.com").await;

    let created = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&token))
        .await;
    let id = created.body["alert"]["id"].as_i64().unwrap();

    let response = app
        .request("PUT", &format!("/api/alerts/{id}/resolve"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_resident_sees_only_own_alert() {
    let app = TestApp::new();
    let (_, owner_token) = app.seed_and_login(OWNER, "owner@example.com").await;
    let (_, tenant_token) = app
        .seed_and_login(Role::Resident(ResidentRole::Tenant), "tenant@example.com")
        .await;

    let created = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&owner_token))
        .await;
    let id = created.body["alert"]["id"].as_i64().unwrap();
    let uri = format!("/api/alerts/{id}");

    let own = app.request("GET", &uri, None, Some(&owner_token)).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["alert"]["id"], id);

    let other = app.request("GET", &uri, None, Some(&tenant_token)).await;
    assert_eq!(other.status, StatusCode::NOT_FOUND);
}
