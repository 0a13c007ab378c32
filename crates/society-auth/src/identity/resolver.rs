//! Resolves a bearer token to exactly one principal.
//!
//! The claimed role selects which of the three disjoint tables to consult;
//! the claimed id must exist there. The attached role then follows the
//! configured [`RoleSource`]: the fresh row's role by default, or the claim
//! verbatim.

use std::sync::Arc;

use tracing::debug;

use society_core::config::{AuthConfig, RoleSource};
use society_database::PrincipalDirectory;
use society_entity::{Principal, Role};

use super::error::IdentityError;
use crate::jwt::JwtDecoder;

/// Turns credentials into principals.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    decoder: JwtDecoder,
    directory: Arc<dyn PrincipalDirectory>,
    role_source: RoleSource,
}

impl IdentityResolver {
    /// Create a resolver over the given principal directory.
    pub fn new(config: &AuthConfig, directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self {
            decoder: JwtDecoder::new(config),
            directory,
            role_source: config.role_source,
        }
    }

    /// Resolve an optional credential; `None` fails with `MissingCredential`.
    pub async fn resolve_optional(&self, token: Option<&str>) -> Result<Principal, IdentityError> {
        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => self.resolve(token).await,
            None => Err(IdentityError::MissingCredential),
        }
    }

    /// Verify the token and fetch the principal it names.
    pub async fn resolve(&self, token: &str) -> Result<Principal, IdentityError> {
        let claims = self.decoder.decode(token)?;

        let claimed: Role = claims
            .role
            .parse()
            .map_err(|_| IdentityError::UnknownRole(claims.role.clone()))?;

        let kind = claimed.kind();
        let record = self
            .directory
            .find_by_id(kind, claims.sub)
            .await
            .map_err(IdentityError::Upstream)?
            .ok_or(IdentityError::PrincipalNotFound {
                kind,
                id: claims.sub,
            })?;

        let role = match self.role_source {
            RoleSource::Row => record.stored_role(),
            RoleSource::Claim => claimed,
        };

        if role != claimed {
            debug!(
                principal_id = claims.sub,
                claimed = %claimed,
                current = %role,
                "Token role differs from stored role"
            );
        }

        Ok(Principal::from_record(record, role))
    }
}
