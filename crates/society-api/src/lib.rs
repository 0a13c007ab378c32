//! # society-api
//!
//! HTTP API layer for the society hub built on Axum.
//!
//! Provides the alert and notification REST endpoints, login, the live
//! channel upgrade at `/ws`, credential extraction from header or cookie,
//! request logging, CORS, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
