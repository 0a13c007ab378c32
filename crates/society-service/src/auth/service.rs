//! Login and principal provisioning.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use society_auth::{IssuedToken, JwtEncoder, PasswordHasher};
use society_core::error::AppError;
use society_core::result::AppResult;
use society_database::PrincipalDirectory;
use society_entity::{FlatKey, NewPrincipal, Principal, Role};

use crate::context::RequestContext;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Outcome of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    /// Signed token and its expiry.
    pub token: IssuedToken,
    /// The principal the token was issued for.
    pub principal: Principal,
}

/// Exchanges email and password for a signed token.
#[derive(Debug, Clone)]
pub struct AuthService {
    directory: Arc<dyn PrincipalDirectory>,
    hasher: PasswordHasher,
    encoder: Arc<JwtEncoder>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(directory: Arc<dyn PrincipalDirectory>, encoder: Arc<JwtEncoder>) -> Self {
        Self {
            directory,
            hasher: PasswordHasher::new(),
            encoder,
        }
    }

    /// Verify credentials against the table `role` selects.
    ///
    /// A resident must ask for the refinement stored on their row. Every
    /// mismatch reports the same unauthenticated error.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> AppResult<LoginResult> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required"));
        }

        let record = self
            .directory
            .find_by_email(role.kind(), email)
            .await?
            .ok_or_else(|| AppError::unauthenticated(INVALID_CREDENTIALS))?;

        if !self.hasher.verify_password(password, record.password_hash())? {
            warn!(email = %email, role = %role, "Login failed: bad password");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let stored = record.stored_role();
        if stored != role {
            warn!(email = %email, requested = %role, stored = %stored, "Login failed: role mismatch");
            return Err(AppError::unauthenticated(INVALID_CREDENTIALS));
        }

        let token = self.encoder.issue(record.id(), stored, record.email())?;
        let principal = Principal::from_record(record, stored);

        info!(user_id = principal.id, role = %principal.role, "Login succeeded");

        Ok(LoginResult { token, principal })
    }

    /// The caller's own principal.
    pub fn me(&self, ctx: &RequestContext) -> Principal {
        ctx.principal.clone()
    }

    /// Create a principal with a plaintext password.
    pub async fn provision(
        &self,
        role: Role,
        name: &str,
        email: &str,
        password: &str,
        flat: Option<FlatKey>,
    ) -> AppResult<Principal> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(AppError::validation("Name and email are required"));
        }
        if role.is_resident() && flat.is_none() {
            return Err(AppError::validation("Residents need a flat, e.g. B-203"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let record = self
            .directory
            .insert(NewPrincipal {
                role,
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                contact: None,
                password_hash,
                flat,
                shift: None,
            })
            .await?;

        info!(user_id = record.id(), role = %role, "Principal provisioned");
        Ok(Principal::from_record(record, role))
    }
}
