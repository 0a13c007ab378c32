//! Alert domain entities.

pub mod kind;
pub mod model;

pub use kind::{AlertStatus, AlertType};
pub use model::{Alert, NewAlert};
