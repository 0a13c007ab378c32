//! In-process store implementations.
//!
//! Used by the `memory` provider for single-node development and by tests.
//! Ids are assigned from per-store atomic sequences starting at 1.

pub mod alert;
pub mod notification;
pub mod principal;

pub use alert::MemoryAlertStore;
pub use notification::MemoryNotificationStore;
pub use principal::MemoryPrincipalDirectory;
