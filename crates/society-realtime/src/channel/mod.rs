//! Rooms and room membership.

pub mod registry;
pub mod room;
pub mod subscription;

pub use registry::RoomRegistry;
pub use room::RoomName;
pub use subscription::SubscriptionTracker;
