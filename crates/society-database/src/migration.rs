//! Database migration runner.
//!
//! The schema comes in two sets. `core` holds principals and alerts;
//! `notifications` holds the notification history, which may be configured
//! onto its own database. Each database gets only the sets it serves.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use society_core::config::DatabaseConfig;
use society_core::error::{AppError, ErrorKind};

/// One migration set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Principal tables and alerts.
    Core,
    /// Notification history.
    Notifications,
}

impl Schema {
    fn migrator(self) -> Migrator {
        let mut migrator = match self {
            Self::Core => sqlx::migrate!("../../migrations/core"),
            Self::Notifications => sqlx::migrate!("../../migrations/notifications"),
        };
        // Both sets share one history table when they share a database.
        migrator.set_ignore_missing(true);
        migrator
    }
}

/// The sets each configured database needs, keyed by URL.
pub fn migration_plan(config: &DatabaseConfig) -> Vec<(&str, Vec<Schema>)> {
    if config.notifications_url() == config.url {
        vec![(config.url.as_str(), vec![Schema::Core, Schema::Notifications])]
    } else {
        vec![
            (config.url.as_str(), vec![Schema::Core]),
            (config.notifications_url(), vec![Schema::Notifications]),
        ]
    }
}

/// Run the pending migrations of the given sets.
pub async fn run_migrations(pool: &PgPool, schemas: &[Schema]) -> Result<(), AppError> {
    for schema in schemas {
        info!(schema = ?schema, "Running database migrations...");

        schema.migrator().run(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::UpstreamUnavailable,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}
