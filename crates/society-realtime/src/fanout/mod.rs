//! Fan-out routing.

pub mod router;

pub use router::{FanoutRouter, PublishReport, RecipientSelector};
