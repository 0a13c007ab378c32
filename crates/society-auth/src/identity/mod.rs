//! Identity resolution.

pub mod error;
pub mod resolver;

pub use error::IdentityError;
pub use resolver::IdentityResolver;
