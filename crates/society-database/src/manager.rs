//! Store manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use society_core::config::DatabaseConfig;
use society_core::error::AppError;
use society_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryAlertStore, MemoryNotificationStore, MemoryPrincipalDirectory};
use crate::migration::{migration_plan, run_migrations};
use crate::postgres::{PgAlertStore, PgNotificationStore, PgPrincipalDirectory};
use crate::store::{AlertStore, NotificationStore, PrincipalDirectory};

/// The set of stores the application runs against.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    principals: Arc<dyn PrincipalDirectory>,
    alerts: Arc<dyn AlertStore>,
    notifications: Arc<dyn NotificationStore>,
    pools: Vec<DatabasePool>,
}

impl StoreManager {
    /// Build the stores from configuration.
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL stores");
                let main = DatabasePool::connect(config, &config.url).await?;
                let mut pools = vec![main.clone()];

                let notification_pool = if config.notifications_url() == config.url {
                    main.clone()
                } else {
                    info!("Notifications use a separate database");
                    let pool = DatabasePool::connect(config, config.notifications_url()).await?;
                    pools.push(pool.clone());
                    pool
                };

                if config.run_migrations {
                    for (url, schemas) in migration_plan(config) {
                        let pool = if url == config.url {
                            &main
                        } else {
                            &notification_pool
                        };
                        run_migrations(pool.pool(), &schemas).await?;
                    }
                }

                Ok(Self {
                    principals: Arc::new(PgPrincipalDirectory::new(
                        main.pool().clone(),
                        config.tables.clone(),
                    )?),
                    alerts: Arc::new(PgAlertStore::new(main.pool().clone())),
                    notifications: Arc::new(PgNotificationStore::new(
                        notification_pool.pool().clone(),
                    )),
                    pools,
                })
            }
            "memory" => {
                info!("Initializing in-memory stores");
                Ok(Self::in_memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::from_stores(
            Arc::new(MemoryPrincipalDirectory::new()),
            Arc::new(MemoryAlertStore::new()),
            Arc::new(MemoryNotificationStore::new()),
        )
    }

    /// Create a manager from existing stores (for testing).
    pub fn from_stores(
        principals: Arc<dyn PrincipalDirectory>,
        alerts: Arc<dyn AlertStore>,
        notifications: Arc<dyn NotificationStore>,
    ) -> Self {
        Self {
            principals,
            alerts,
            notifications,
            pools: Vec::new(),
        }
    }

    /// The principal directory.
    pub fn principals(&self) -> Arc<dyn PrincipalDirectory> {
        Arc::clone(&self.principals)
    }

    /// The alert store.
    pub fn alerts(&self) -> Arc<dyn AlertStore> {
        Arc::clone(&self.alerts)
    }

    /// The notification store.
    pub fn notifications(&self) -> Arc<dyn NotificationStore> {
        Arc::clone(&self.notifications)
    }

    /// Check every store.
    pub async fn health_check(&self) -> AppResult<bool> {
        Ok(self.principals.health_check().await?
            && self.alerts.health_check().await?
            && self.notifications.health_check().await?)
    }

    /// Close any database pools.
    pub async fn close(&self) {
        for pool in &self.pools {
            pool.close().await;
        }
    }
}
