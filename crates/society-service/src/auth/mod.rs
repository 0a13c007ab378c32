//! Credential exchange.

pub mod service;

pub use service::{AuthService, LoginResult};
