//! # society-database
//!
//! Durable stores for the society hub. Three store traits cover the
//! principal directory, alerts, and notifications; each has a PostgreSQL
//! implementation and an in-process implementation built on `dashmap`.
//! [`StoreManager`] picks one set at startup from `database.provider`.

pub mod connection;
pub mod error;
pub mod manager;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use manager::StoreManager;
pub use store::{AlertStore, NotificationStore, PrincipalDirectory};
