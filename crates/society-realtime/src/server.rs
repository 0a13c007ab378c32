//! Top-level live channel engine.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use society_core::config::RealtimeConfig;

use crate::channel::registry::RoomRegistry;
use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::fanout::router::FanoutRouter;
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};

/// Ties together connections, rooms, routing, and counters.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Room registry.
    pub rooms: Arc<RoomRegistry>,
    /// Fan-out router.
    pub router: FanoutRouter,
    /// Counters.
    pub metrics: Arc<RealtimeMetrics>,
    heartbeat: HeartbeatConfig,
    shutdown_tx: broadcast::Sender<()>,
}

impl RealtimeEngine {
    /// Creates the engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let heartbeat = HeartbeatConfig::from(&config);

        let metrics = Arc::new(RealtimeMetrics::new());
        let rooms = Arc::new(RoomRegistry::new());
        let connections = Arc::new(ConnectionManager::new(
            config,
            Arc::clone(&rooms),
            Arc::clone(&metrics),
        ));
        let router = FanoutRouter::new(Arc::clone(&connections), Arc::clone(&metrics));

        info!("Live channel engine initialized");

        Self {
            connections,
            rooms,
            router,
            metrics,
            heartbeat,
            shutdown_tx,
        }
    }

    /// Heartbeat timing for new connections.
    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }

    /// Counter snapshot.
    pub fn stats(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Receiver that fires once on shutdown.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signals connection tasks to stop and closes every connection.
    pub fn shutdown(&self) {
        info!("Shutting down live channel engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
    }
}
