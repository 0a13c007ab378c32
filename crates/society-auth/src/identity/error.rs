//! Identity resolution failures.

use thiserror::Error;

use society_core::error::{AppError, ErrorKind};
use society_entity::{PrincipalId, PrincipalKind};

/// Why a credential did not resolve to a principal.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// No credential in the header, cookie, or query.
    #[error("No credential supplied")]
    MissingCredential,
    /// Malformed token or bad signature.
    #[error("Token is invalid: {0}")]
    TokenInvalid(String),
    /// Signature fine, but past expiry.
    #[error("Token has expired")]
    TokenExpired,
    /// The claimed role is not one of the five known roles.
    #[error("Unknown role in token: '{0}'")]
    UnknownRole(String),
    /// No row with the claimed id in the role's table.
    #[error("No {kind} with id {id}")]
    PrincipalNotFound {
        /// Table consulted.
        kind: PrincipalKind,
        /// Claimed id.
        id: PrincipalId,
    },
    /// The directory could not be reached.
    #[error("Principal lookup failed: {0}")]
    Upstream(#[source] AppError),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Upstream(source) => AppError::with_source(
                ErrorKind::UpstreamUnavailable,
                "Identity lookup is unavailable",
                source,
            ),
            other => AppError::unauthenticated(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_to_app_error() {
        let e: AppError = IdentityError::TokenExpired.into();
        assert_eq!(e.kind, ErrorKind::Unauthenticated);

        let e: AppError = IdentityError::UnknownRole("Resident".to_string()).into();
        assert_eq!(e.kind, ErrorKind::Unauthenticated);
        assert!(e.message.contains("Resident"));

        let e: AppError = IdentityError::Upstream(AppError::upstream("db down")).into();
        assert_eq!(e.kind, ErrorKind::UpstreamUnavailable);
    }
}
