//! Client subscription manager.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use society_entity::Principal;
use society_realtime::OutboundEvent;

use crate::error::ClientError;
use crate::rest::ApiClient;
use crate::state::LiveState;

type LiveStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_BUFFER: usize = 256;
const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

struct LiveConnection {
    principal: Principal,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Owns one principal session's live connection and merged view.
pub struct SubscriptionManager {
    api: ApiClient,
    state: Arc<Mutex<LiveState>>,
    events: broadcast::Sender<OutboundEvent>,
    connection: Option<LiveConnection>,
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

impl SubscriptionManager {
    /// Manager over a (logged-in) API client.
    pub fn new(api: ApiClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            api,
            state: Arc::new(Mutex::new(LiveState::new())),
            events,
            connection: None,
        }
    }

    /// The REST client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Whether a live connection is open.
    pub fn is_mounted(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| !c.task.is_finished())
    }

    /// The principal of the current connection.
    pub fn principal(&self) -> Option<&Principal> {
        self.connection.as_ref().map(|c| &c.principal)
    }

    /// A copy of the merged view.
    pub fn snapshot(&self) -> LiveState {
        lock(&self.state).clone()
    }

    /// Events as they are applied.
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundEvent> {
        self.events.subscribe()
    }

    /// Open the live connection, join the principal's rooms, then fetch the
    /// durable history and merge it.
    ///
    /// The fetch starts only after the server has acknowledged every join, so
    /// anything stored after the fetch is also pushed to this connection.
    pub async fn mount(&mut self) -> Result<Principal, ClientError> {
        if self.connection.is_some() {
            self.unmount().await;
        }

        let me = self.api.me().await;
        let principal = self.guard(me)?;

        let url = self.api.live_url()?;
        let (mut stream, _) = connect_async(url.as_str()).await?;

        let mut pending = HashSet::new();
        if let Some(room) = principal.role.room() {
            send_event(&mut stream, "join-role", json!(room)).await?;
            pending.insert(room.to_string());
        }
        send_event(&mut stream, "join-user", json!(principal.id)).await?;
        pending.insert(format!("user-{}", principal.id));

        let joined = timeout(
            JOIN_TIMEOUT,
            await_joins(&mut stream, pending, &self.state, &self.events),
        )
        .await
        .unwrap_or(Err(ClientError::NotMounted));
        if let Err(e) = joined {
            let _ = stream.close(None).await;
            return Err(e);
        }

        let (stop, stop_rx) = oneshot::channel();
        let task = tokio::spawn(read_loop(
            stream,
            stop_rx,
            Arc::clone(&self.state),
            self.events.clone(),
        ));

        info!(user_id = principal.id, role = %principal.role, "Live channel mounted");
        self.connection = Some(LiveConnection {
            principal: principal.clone(),
            stop,
            task,
        });

        self.refresh().await?;
        Ok(principal)
    }

    /// Re-fetch the durable history and merge it into the view.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let notifications = self.api.notifications().await;
        let notifications = self.guard(notifications)?;
        lock(&self.state).reconcile_notifications(notifications);

        let is_staff = self
            .principal()
            .is_some_and(|p| p.role.is_admin() || p.role.is_guard());
        if is_staff {
            let alerts = self.api.alerts(None).await;
            let alerts = self.guard(alerts)?;
            lock(&self.state).reconcile_alerts(alerts);
        }
        Ok(())
    }

    /// Merge one event into the view and pass it on to subscribers.
    pub fn apply_event(&self, event: OutboundEvent) -> bool {
        apply(&self.state, &self.events, event)
    }

    /// Mark a notification read on the server, then locally.
    ///
    /// The pushed copy never changes on its own; the local view is updated
    /// here once the server has accepted the change.
    pub async fn mark_read(&mut self, id: i64) -> Result<(), ClientError> {
        let result = self.api.mark_read(id).await;
        self.guard(result)?;
        lock(&self.state).mark_read(id);
        Ok(())
    }

    /// Mark every notification read on the server, then locally.
    pub async fn mark_all_read(&mut self) -> Result<(), ClientError> {
        let result = self.api.mark_all_read().await;
        self.guard(result)?;
        lock(&self.state).mark_all_read();
        Ok(())
    }

    /// Close the live connection. Room membership goes with it.
    pub async fn unmount(&mut self) {
        if let Some(connection) = self.connection.take() {
            let _ = connection.stop.send(());
            if let Err(e) = connection.task.await {
                warn!(error = %e, "Live channel task ended abnormally");
            }
            info!(user_id = connection.principal.id, "Live channel unmounted");
        }
    }

    /// Unmount, forget the token, and clear the view.
    pub async fn logout(&mut self) {
        self.unmount().await;
        self.api.clear_token();
        *lock(&self.state) = LiveState::new();
    }

    /// Tear the connection down when the server says the credential is gone.
    fn guard<T>(&mut self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(e) = &result {
            if e.requires_login() {
                if let Some(connection) = self.connection.take() {
                    connection.task.abort();
                }
                *lock(&self.state) = LiveState::new();
            }
        }
        result
    }
}

fn lock(state: &Mutex<LiveState>) -> MutexGuard<'_, LiveState> {
    state.lock().unwrap_or_else(|p| p.into_inner())
}

fn apply(
    state: &Mutex<LiveState>,
    events: &broadcast::Sender<OutboundEvent>,
    event: OutboundEvent,
) -> bool {
    let changed = lock(state).apply(&event);
    let _ = events.send(event);
    changed
}

async fn send_event(
    stream: &mut LiveStream,
    event: &str,
    data: serde_json::Value,
) -> Result<(), ClientError> {
    let frame = json!({ "event": event, "data": data }).to_string();
    stream.send(Message::text(frame)).await?;
    Ok(())
}

async fn send_pong(stream: &mut LiveStream) -> Result<(), ClientError> {
    send_event(stream, "pong", json!(Utc::now().timestamp_millis())).await
}

/// Reads frames until every room in `pending` has been acknowledged.
/// Other events that arrive first are applied as usual.
async fn await_joins(
    stream: &mut LiveStream,
    mut pending: HashSet<String>,
    state: &Mutex<LiveState>,
    events: &broadcast::Sender<OutboundEvent>,
) -> Result<(), ClientError> {
    while !pending.is_empty() {
        let text = match stream.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => return Err(ClientError::NotMounted),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        };
        let event = match serde_json::from_str::<OutboundEvent>(text.as_str()) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Unreadable live frame");
                continue;
            }
        };
        match &event {
            OutboundEvent::Joined { room } => {
                debug!(room = %room, "Joined room");
                pending.remove(room);
            }
            OutboundEvent::Error { code, message } => {
                return Err(ClientError::JoinRejected {
                    code: code.clone(),
                    message: message.clone(),
                });
            }
            OutboundEvent::Ping { .. } => send_pong(stream).await?,
            _ => {}
        }
        apply(state, events, event);
    }
    Ok(())
}

async fn read_loop(
    mut stream: LiveStream,
    mut stop: oneshot::Receiver<()>,
    state: Arc<Mutex<LiveState>>,
    events: broadcast::Sender<OutboundEvent>,
) {
    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let event = match serde_json::from_str::<OutboundEvent>(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!(error = %e, "Unreadable live frame");
                            continue;
                        }
                    };
                    match &event {
                        OutboundEvent::Ping { .. } => {
                            if send_pong(&mut stream).await.is_err() {
                                break;
                            }
                        }
                        OutboundEvent::Error { code, message } => {
                            warn!(code = %code, message = %message, "Live channel error event");
                        }
                        OutboundEvent::Joined { room } => debug!(room = %room, "Joined room"),
                        _ => {}
                    }
                    apply(&state, &events, event);
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Live channel closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(error = %e, "Live channel read failed");
                    break;
                }
            },
            _ = &mut stop => {
                let _ = stream.close(None).await;
                break;
            }
        }
    }
}
