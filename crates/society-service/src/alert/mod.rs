//! Emergency alerts.

pub mod service;

pub use service::AlertService;
