//! Connection lifecycle.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod manager;
pub mod pool;

pub use authenticator::WsAuthenticator;
pub use handle::{ConnectionHandle, ConnectionId};
pub use heartbeat::{HeartbeatConfig, run_heartbeat};
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;
