//! Request handlers organized by domain.

pub mod alert;
pub mod auth;
pub mod health;
pub mod notification;
pub mod ws;
