//! Store configuration.

use serde::{Deserialize, Serialize};

/// Store provider and connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store provider: `"postgres"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// PostgreSQL connection URL for principals and alerts.
    #[serde(default)]
    pub url: String,
    /// Connection URL for the notification history. Falls back to `url`.
    #[serde(default)]
    pub notifications_url: Option<String>,
    /// Maximum number of connections in each pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in each pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Whether to run migrations at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
    /// Per-role table names.
    #[serde(default)]
    pub tables: PrincipalTables,
}

impl DatabaseConfig {
    /// The URL the notification store connects to.
    pub fn notifications_url(&self) -> &str {
        self.notifications_url.as_deref().unwrap_or(&self.url)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            url: String::new(),
            notifications_url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            run_migrations: true,
            tables: PrincipalTables::default(),
        }
    }
}

/// Names of the three disjoint principal tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalTables {
    /// Admin table.
    #[serde(default = "default_admins")]
    pub admins: String,
    /// Guard table.
    #[serde(default = "default_guards")]
    pub guards: String,
    /// Resident table (owners, tenants, family members).
    #[serde(default = "default_residents")]
    pub residents: String,
}

impl Default for PrincipalTables {
    fn default() -> Self {
        Self {
            admins: default_admins(),
            guards: default_guards(),
            residents: default_residents(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_admins() -> String {
    "admins".to_string()
}

fn default_guards() -> String {
    "guards".to_string()
}

fn default_residents() -> String {
    "residents".to_string()
}
