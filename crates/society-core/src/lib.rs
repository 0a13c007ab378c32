//! # society-core
//!
//! Core crate for the society hub. Contains the unified error system and
//! the configuration schemas shared by every other crate.
//!
//! This crate has **no** internal dependencies on other society crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
