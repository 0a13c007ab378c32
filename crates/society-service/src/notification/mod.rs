//! Notification fan-out and per-user history.

pub mod service;

pub use service::{FanoutReport, NotificationService, RecipientFailure};
