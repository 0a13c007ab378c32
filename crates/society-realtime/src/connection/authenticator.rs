//! Live channel authentication.

use society_auth::{IdentityError, IdentityResolver};
use society_entity::Principal;

/// Authenticates live channel connections with the same resolver the REST
/// surface uses.
#[derive(Debug, Clone)]
pub struct WsAuthenticator {
    resolver: IdentityResolver,
}

impl WsAuthenticator {
    /// Creates a new authenticator.
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    /// Resolve the credential presented at upgrade time.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Principal, IdentityError> {
        self.resolver.resolve_optional(token).await
    }
}
