//! Integration tests for notification fan-out, history, and read state.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use society_entity::{ResidentRole, Role};

use helpers::{TestApp, drain, event_names};

const FAMILY: Role = Role::Resident(ResidentRole::FamilyMember);

fn maintenance_request() -> serde_json::Value {
    json!({
        "type": "maintenance",
        "title": "Lift stuck",
        "message": "Lift in wing B is stuck on floor 2",
        "data": { "wing": "B" }
    })
}

#[tokio::test]
async fn test_notify_admins_writes_one_row_per_admin() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(FAMILY, "family@example.com").await;
    let first = app.seed(Role::Admin, "a1@example.com").await;
    let second = app.seed(Role::Admin, "a2@example.com").await;
    let guard = app.seed(Role::Guard, "guard@example.com").await;

    let mut first_rx = app.connect(&first);
    let mut second_rx = app.connect(&second);
    let mut guard_rx = app.connect(&guard);

    let response = app
        .request(
            "POST",
            "/api/notifications/admin",
            Some(maintenance_request()),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    let rows = response.body["notifications"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(response.body["failed"].as_array().unwrap().is_empty());

    for (rx, admin) in [(&mut first_rx, &first), (&mut second_rx, &second)] {
        let frames = drain(rx);
        assert_eq!(event_names(&frames), vec!["notification"]);
        assert_eq!(frames[0]["data"]["user_id"], admin.id);
        assert_eq!(frames[0]["data"]["is_read"], false);
        assert_eq!(frames[0]["data"]["data"]["wing"], "B");
    }
    assert!(drain(&mut guard_rx).is_empty());
}

#[tokio::test]
async fn test_notify_admins_without_admins() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(FAMILY, "family@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/notifications/admin",
            Some(maintenance_request()),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NO_RECIPIENTS");
}

#[tokio::test]
async fn test_notify_admins_requires_title() {
    let app = TestApp::new();
    let (_, token) = app.seed_and_login(FAMILY, "family@example.com").await;
    app.seed(Role::Admin, "admin@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/notifications/admin",
            Some(json!({ "type": "maintenance", "message": "No title" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_live_copy_stays_unread_while_history_reflects_read() {
    let app = TestApp::new();
    let (_, sender_token) = app.seed_and_login(FAMILY, "family@example.com").await;
    let (admin, admin_token) = app.seed_and_login(Role::Admin, "admin@example.com").await;
    let mut admin_rx = app.connect(&admin);

    app.request(
        "POST",
        "/api/notifications/admin",
        Some(maintenance_request()),
        Some(&sender_token),
    )
    .await;

    let pushed = drain(&mut admin_rx);
    let id = pushed[0]["data"]["id"].as_i64().unwrap();
    assert_eq!(pushed[0]["data"]["is_read"], false);

    let polled = app
        .request("GET", "/api/notifications", None, Some(&admin_token))
        .await;
    assert_eq!(polled.body[0]["id"], id);
    assert_eq!(polled.body[0]["is_read"], false);

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&admin_token))
        .await;
    assert_eq!(count.body["count"], 1);

    let marked = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(marked.status, StatusCode::OK);
    assert_eq!(marked.body["success"], true);

    let echo = drain(&mut admin_rx);
    assert_eq!(event_names(&echo), vec!["notification-read"]);
    assert_eq!(echo[0]["data"]["id"], id);

    let polled = app
        .request("GET", &format!("/api/notifications/{id}"), None, Some(&admin_token))
        .await;
    assert_eq!(polled.body["is_read"], true);
    assert_eq!(pushed[0]["data"]["is_read"], false);

    let count = app
        .request("GET", "/api/notifications/unread-count", None, Some(&admin_token))
        .await;
    assert_eq!(count.body["count"], 0);
}

#[tokio::test]
async fn test_other_principals_notifications_are_not_found() {
    let app = TestApp::new();
    let (_, sender_token) = app.seed_and_login(FAMILY, "family@example.com").await;
    let (_, admin_token) = app.seed_and_login(Role::Admin, "admin@example.com").await;
    let (_, guard_token) = app.seed_and_login(Role::Guard, "guard@example.com").await;

    let created = app
        .request(
            "POST",
            "/api/notifications/admin",
            Some(maintenance_request()),
            Some(&sender_token),
        )
        .await;
    let id = created.body["notifications"][0]["id"].as_i64().unwrap();

    // The guard shares row id 1 with the admin, but lives in another table.
    let read = app
        .request("PUT", &format!("/api/notifications/{id}/read"), None, Some(&guard_token))
        .await;
    assert_eq!(read.status, StatusCode::NOT_FOUND);

    let get = app
        .request("GET", &format!("/api/notifications/{id}"), None, Some(&guard_token))
        .await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);

    let still_unread = app
        .request("GET", &format!("/api/notifications/{id}"), None, Some(&admin_token))
        .await;
    assert_eq!(still_unread.body["is_read"], false);
}

#[tokio::test]
async fn test_mark_all_read() {
    let app = TestApp::new();
    let (_, sender_token) = app.seed_and_login(FAMILY, "family@example.com").await;
    let (admin, admin_token) = app.seed_and_login(Role::Admin, "admin@example.com").await;

    for _ in 0..3 {
        app.request(
            "POST",
            "/api/notifications/admin",
            Some(maintenance_request()),
            Some(&sender_token),
        )
        .await;
    }

    let mut admin_rx = app.connect(&admin);

    let first = app
        .request("PUT", "/api/notifications/read/all", None, Some(&admin_token))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["updated"], 3);
    assert_eq!(event_names(&drain(&mut admin_rx)), vec!["notifications-read-all"]);

    let second = app
        .request("PUT", "/api/notifications/read/all", None, Some(&admin_token))
        .await;
    assert_eq!(second.body["updated"], 0);
    assert!(drain(&mut admin_rx).is_empty());
}

#[tokio::test]
async fn test_history_requires_authentication() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/notifications", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
