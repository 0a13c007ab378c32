//! # society-realtime
//!
//! Live channel engine for the society hub:
//!
//! - Connection registry with per-principal limits and heartbeat
//! - Role rooms (`admins`, `guards`) and per-principal user rooms
//! - The `join-role` / `join-user` protocol with join authorization
//! - Fan-out routing of alert and notification events to rooms
//!
//! Room membership lives only as long as the connection that holds it.

pub mod channel;
pub mod connection;
pub mod fanout;
pub mod message;
pub mod metrics;
pub mod server;

pub use channel::registry::RoomRegistry;
pub use channel::room::RoomName;
pub use connection::manager::ConnectionManager;
pub use fanout::router::{FanoutRouter, PublishReport, RecipientSelector};
pub use message::types::{InboundEvent, OutboundEvent};
pub use server::RealtimeEngine;
