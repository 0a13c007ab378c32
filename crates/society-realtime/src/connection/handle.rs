//! Individual live connection handle.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, mpsc};
use tokio::time::Instant;
use uuid::Uuid;

use society_entity::Principal;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Outcome of queueing one frame on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Frame queued.
    Queued,
    /// Outbound buffer full; frame dropped.
    Dropped,
    /// Connection closed.
    Closed,
}

/// A handle to one connected client.
///
/// Holds the sender half of the connection's outbound queue plus the
/// authenticated principal.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection id.
    pub id: ConnectionId,
    /// Principal that owns this connection.
    pub principal: Principal,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    last_seen: Mutex<Instant>,
    alive: AtomicBool,
    closed: Notify,
}

impl ConnectionHandle {
    /// Create a new connection handle.
    pub fn new(principal: Principal, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            principal,
            connected_at: Utc::now(),
            sender,
            last_seen: Mutex::new(Instant::now()),
            alive: AtomicBool::new(true),
            closed: Notify::new(),
        }
    }

    /// Queue a text frame without waiting.
    pub fn send(&self, frame: String) -> SendOutcome {
        if !self.is_alive() {
            return SendOutcome::Closed;
        }
        match self.sender.try_send(frame) {
            Ok(()) => SendOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                SendOutcome::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                SendOutcome::Closed
            }
        }
    }

    /// Whether the connection is still open.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection closed and wake anyone waiting in [`Self::closed`].
    pub fn close(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            self.closed.notify_waiters();
        }
    }

    /// Resolves once the connection is closed.
    pub async fn closed(&self) {
        let notified = self.closed.notified();
        if !self.is_alive() {
            return;
        }
        notified.await;
    }

    /// Record client activity.
    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(|p| p.into_inner()) = Instant::now();
    }

    /// Time since the last client activity.
    pub fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use society_entity::Role;

    fn principal() -> Principal {
        Principal {
            id: 1,
            role: Role::Guard,
            email: "g@example.com".to_string(),
            name: "Gate".to_string(),
            contact: None,
            flat: None,
        }
    }

    #[tokio::test]
    async fn test_full_buffer_drops() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(principal(), tx);
        assert_eq!(handle.send("a".to_string()), SendOutcome::Queued);
        assert_eq!(handle.send("b".to_string()), SendOutcome::Dropped);
        assert_eq!(rx.recv().await.unwrap(), "a");
        assert!(handle.is_alive());
    }

    #[tokio::test]
    async fn test_closed_receiver_closes_handle() {
        let (tx, rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(principal(), tx);
        drop(rx);
        assert_eq!(handle.send("a".to_string()), SendOutcome::Closed);
        assert!(!handle.is_alive());
        handle.closed().await;
    }
}
