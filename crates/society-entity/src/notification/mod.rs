//! Notification domain entities.

pub mod model;

pub use model::{NewNotification, Notification, Recipient, ALERT_KIND};
