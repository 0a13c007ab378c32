//! End-to-end tests: a subscription manager against a served app.

mod helpers;

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::timeout;

use society_client::{ApiClient, ClientError, SubscriptionManager};
use society_entity::{AlertStatus, AlertType, ResidentRole, Role};
use society_realtime::OutboundEvent;

use helpers::{PASSWORD, TestApp};

const OWNER: Role = Role::Resident(ResidentRole::Owner);

async fn serve(app: &TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Waits for the first event matching `pred`.
async fn next_matching(
    rx: &mut broadcast::Receiver<OutboundEvent>,
    pred: impl Fn(&OutboundEvent) -> bool,
) -> OutboundEvent {
    timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.unwrap();
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for live event")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_alert_round_trip_through_live_channel() {
    let app = TestApp::new();
    app.seed(Role::Admin, "admin@example.com").await;
    app.seed(OWNER, "owner@example.com").await;
    let base = serve(&app).await;

    let admin_api = ApiClient::new(base.clone());
    admin_api
        .login("admin@example.com", PASSWORD, Role::Admin)
        .await
        .unwrap();
    let mut manager = SubscriptionManager::new(admin_api);
    let mut events = manager.subscribe();
    let principal = manager.mount().await.unwrap();
    assert_eq!(principal.role, Role::Admin);
    assert!(manager.is_mounted());

    // Both the admins room and the user room acknowledge before anything is raised.
    for _ in 0..2 {
        next_matching(&mut events, |e| matches!(e, OutboundEvent::Joined { .. })).await;
    }

    let resident_api = ApiClient::new(base);
    resident_api
        .login("owner@example.com", PASSWORD, OWNER)
        .await
        .unwrap();
    let raised = resident_api
        .raise_alert(AlertType::Medical, "Fainted in the lobby", "B-203")
        .await
        .unwrap();

    next_matching(&mut events, |e| matches!(e, OutboundEvent::NewAlert(a) if a.id == raised.id)).await;
    next_matching(&mut events, |e| matches!(e, OutboundEvent::Notification(_))).await;

    let view = manager.snapshot();
    assert_eq!(view.alerts[0].id, raised.id);
    assert_eq!(view.unread_count(), 1);
    let notification_id = view.notifications[0].id;

    manager.api().resolve_alert(raised.id).await.unwrap();
    next_matching(&mut events, |e| matches!(e, OutboundEvent::AlertResolved { id } if *id == raised.id))
        .await;
    assert_eq!(manager.snapshot().alerts[0].status, AlertStatus::Resolved);

    manager.mark_read(notification_id).await.unwrap();
    assert_eq!(manager.snapshot().unread_count(), 0);

    manager.logout().await;
    assert!(!manager.is_mounted());
    assert!(manager.api().token().is_none());
    assert!(manager.snapshot().notifications.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mount_returns_after_rooms_are_joined() {
    let app = TestApp::new();
    app.seed(Role::Guard, "gate@example.com").await;
    app.seed(OWNER, "owner@example.com").await;
    let base = serve(&app).await;

    let guard_api = ApiClient::new(base.clone());
    guard_api
        .login("gate@example.com", PASSWORD, Role::Guard)
        .await
        .unwrap();
    let mut manager = SubscriptionManager::new(guard_api);
    let mut events = manager.subscribe();
    manager.mount().await.unwrap();

    // Both acks were consumed during mount.
    let mut joined = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let OutboundEvent::Joined { room } = event {
            joined.push(room);
        }
    }
    joined.sort();
    assert_eq!(joined, vec!["guards".to_string(), "user-1".to_string()]);

    // Raised right after mount, with no wait on acks: still pushed.
    let resident_api = ApiClient::new(base);
    resident_api
        .login("owner@example.com", PASSWORD, OWNER)
        .await
        .unwrap();
    let raised = resident_api
        .raise_alert(AlertType::Security, "Stranger at the gate", "B-203")
        .await
        .unwrap();

    next_matching(&mut events, |e| matches!(e, OutboundEvent::NewAlert(a) if a.id == raised.id)).await;
    assert_eq!(manager.snapshot().alerts[0].id, raised.id);

    manager.unmount().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_forbidden_keeps_credential_and_unauthenticated_drops_it() {
    let app = TestApp::new();
    app.seed(OWNER, "owner@example.com").await;
    let base = serve(&app).await;

    let api = ApiClient::new(base.clone());
    api.login("owner@example.com", PASSWORD, OWNER).await.unwrap();

    let forbidden = api.alerts(None).await.unwrap_err();
    assert!(matches!(forbidden, ClientError::Forbidden(_)));
    assert!(api.token().is_some());

    let stale = ApiClient::new(base).with_token("expired-or-forged");
    let unauthenticated = stale.me().await.unwrap_err();
    assert!(matches!(unauthenticated, ClientError::Unauthenticated(_)));
    assert!(stale.token().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_mount_without_login_fails() {
    let app = TestApp::new();
    let base = serve(&app).await;

    let mut manager = SubscriptionManager::new(ApiClient::new(base));
    let err = manager.mount().await.unwrap_err();

    assert!(matches!(err, ClientError::NotLoggedIn));
    assert!(!manager.is_mounted());
}
