//! Connection pool: all open connections, indexed by id and by principal.

use std::sync::Arc;

use dashmap::DashMap;

use society_entity::{PrincipalId, PrincipalKind};

use super::handle::{ConnectionHandle, ConnectionId};

/// Key of one principal across the three tables.
pub type PrincipalKey = (PrincipalKind, PrincipalId);

/// Thread-safe pool of open connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Principal → connections, oldest first.
    by_principal: DashMap<PrincipalKey, Vec<Arc<ConnectionHandle>>>,
    /// Connection id → handle.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    fn key_of(handle: &ConnectionHandle) -> PrincipalKey {
        (handle.principal.role.kind(), handle.principal.id)
    }

    /// Adds a connection.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, Arc::clone(&handle));
        self.by_principal
            .entry(Self::key_of(&handle))
            .or_default()
            .push(handle);
    }

    /// Removes a connection.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        let key = Self::key_of(&handle);
        if let Some(mut connections) = self.by_principal.get_mut(&key) {
            connections.retain(|c| c.id != *conn_id);
            if connections.is_empty() {
                drop(connections);
                self.by_principal.remove_if(&key, |_, c| c.is_empty());
            }
        }
        Some(handle)
    }

    /// A principal's connections, oldest first.
    pub fn principal_connections(&self, key: &PrincipalKey) -> Vec<Arc<ConnectionHandle>> {
        self.by_principal
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a connection by id.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of open connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of distinct connected principals.
    pub fn principal_count(&self) -> usize {
        self.by_principal.len()
    }

    /// All open connections.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}
