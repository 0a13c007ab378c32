//! # society-auth
//!
//! Authentication and authorization for the society hub.
//!
//! ## Modules
//!
//! - `jwt`: signed token issuance and validation
//! - `password`: Argon2id password hashing
//! - `identity`: resolving a token to exactly one principal row
//! - `rbac`: the allowed-roles gate

pub mod identity;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use identity::{IdentityError, IdentityResolver};
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use rbac::{AllowedRoles, authorize};
