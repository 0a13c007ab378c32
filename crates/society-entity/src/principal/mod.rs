//! Principal domain entities.

pub mod flat;
pub mod model;
pub mod role;

pub use flat::FlatKey;
pub use model::{Admin, Guard, NewPrincipal, Principal, PrincipalId, PrincipalRecord, Resident};
pub use role::{PrincipalKind, ResidentRole, Role};
