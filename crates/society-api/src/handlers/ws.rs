//! Live channel upgrade handler.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::HeaderMap;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info, warn};

use society_entity::Principal;
use society_realtime::connection::run_heartbeat;

use crate::error::ApiResult;
use crate::extractors::bearer_or_cookie;
use crate::state::AppState;

/// Query parameter for live channel authentication.
#[derive(Debug, Default, serde::Deserialize)]
pub struct WsQuery {
    /// JWT, for clients that cannot set headers on the upgrade.
    pub token: Option<String>,
}

/// GET /ws?token={jwt}
///
/// The credential is resolved before the upgrade; a bad one gets a plain
/// 401 instead of a socket.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| bearer_or_cookie(&headers, &state.config.auth.cookie_name));

    let principal = state
        .ws_authenticator
        .authenticate(token.as_deref())
        .await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, principal, socket)))
}

/// Runs one established connection until either side goes away.
async fn handle_socket(state: AppState, principal: Principal, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let connections = Arc::clone(&state.realtime.connections);
    let mut shutdown = state.realtime.shutdown_receiver();

    let (handle, mut outbound_rx) = connections.register(principal);
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        user_id = handle.principal.id,
        role = %handle.principal.role,
        "Live channel connection established"
    );

    let heartbeat = tokio::spawn(run_heartbeat(Arc::clone(&handle), state.realtime.heartbeat()));

    let outbound = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    loop {
        tokio::select! {
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => connections.handle_inbound(&conn_id, text.as_str()),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => handle.touch(),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Binary(_))) => {
                    debug!(conn_id = %conn_id, "Ignoring binary frame");
                }
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "Live channel read error");
                    break;
                }
            },
            _ = handle.closed() => {
                debug!(conn_id = %conn_id, "Connection closed by server");
                break;
            }
            _ = shutdown.recv() => break,
        }
    }

    connections.unregister(&conn_id);
    heartbeat.abort();
    drop(handle);
    outbound.abort();

    info!(conn_id = %conn_id, "Live channel connection closed");
}
