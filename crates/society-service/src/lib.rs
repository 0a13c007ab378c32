//! # society-service
//!
//! Business logic for the society hub. Every mutating operation persists
//! first and then publishes through the fan-out router; publish problems are
//! logged and never fail the call.

pub mod alert;
pub mod auth;
pub mod context;
pub mod notification;

pub use alert::AlertService;
pub use auth::AuthService;
pub use context::RequestContext;
pub use notification::{FanoutReport, NotificationService, RecipientFailure};

#[cfg(test)]
pub(crate) mod testing;
