//! Ping/pong heartbeat.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;

use society_core::config::RealtimeConfig;

use super::handle::{ConnectionHandle, SendOutcome};
use crate::message::types::OutboundEvent;

/// Heartbeat timing.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings.
    pub ping_interval: Duration,
    /// Grace after a missed ping before the connection is dropped.
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds),
        }
    }
}

impl HeartbeatConfig {
    /// Inactivity after which a connection is considered dead.
    pub fn dead_after(&self) -> Duration {
        self.ping_interval + self.ping_timeout
    }
}

/// Ping the client periodically and close the connection once it has been
/// silent for longer than [`HeartbeatConfig::dead_after`].
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval(config.ping_interval);

    loop {
        interval.tick().await;

        if !handle.is_alive() {
            break;
        }

        let idle = handle.idle_for();
        if idle > config.dead_after() {
            tracing::warn!(conn_id = %handle.id, idle_ms = idle.as_millis() as u64, "Heartbeat timeout");
            handle.close();
            break;
        }

        let ping = OutboundEvent::Ping {
            timestamp: Utc::now().timestamp_millis(),
        };
        let Ok(frame) = ping.to_frame() else {
            continue;
        };
        if handle.send(frame) == SendOutcome::Closed {
            break;
        }
    }

    tracing::debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
