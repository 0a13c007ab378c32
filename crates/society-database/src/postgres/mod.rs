//! PostgreSQL store implementations.

pub mod alert;
pub mod notification;
pub mod principal;

pub use alert::PgAlertStore;
pub use notification::PgNotificationStore;
pub use principal::PgPrincipalDirectory;
