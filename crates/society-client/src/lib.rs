//! # society-client
//!
//! Client side of the live channel. A [`SubscriptionManager`] fetches the
//! principal's durable history over REST, opens one live connection, joins
//! the principal's rooms, and merges pushed events into a local
//! newest-first view. The REST history is the source of truth; pushed
//! events only make the view current sooner.

pub mod error;
pub mod rest;
pub mod state;
pub mod subscription;

pub use error::ClientError;
pub use rest::{ApiClient, Session};
pub use state::LiveState;
pub use subscription::SubscriptionManager;
