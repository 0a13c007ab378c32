//! Request context carrying the resolved principal.

use chrono::{DateTime, Utc};
use serde::Serialize;

use society_auth::{AllowedRoles, authorize};
use society_core::result::AppResult;
use society_entity::{Principal, PrincipalId, PrincipalKind, Role};

/// Context for the current authenticated request.
///
/// Built by the API extractor and passed into service methods so that every
/// operation knows who is acting.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The resolved principal.
    pub principal: Principal,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            request_time: Utc::now(),
        }
    }

    /// The caller's id within its own table.
    pub fn user_id(&self) -> PrincipalId {
        self.principal.id
    }

    /// The caller's role.
    pub fn role(&self) -> Role {
        self.principal.role
    }

    /// Which table the caller lives in.
    pub fn kind(&self) -> PrincipalKind {
        self.principal.role.kind()
    }

    /// Fail with `Forbidden` unless the caller's role is in `allowed`.
    pub fn require(&self, allowed: &AllowedRoles) -> AppResult<()> {
        authorize(self.principal.role, allowed)
    }
}
