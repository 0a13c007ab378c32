//! Live channel message definitions and validation.

pub mod types;
pub mod validator;

pub use types::{InboundEvent, OutboundEvent};
