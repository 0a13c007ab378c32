//! The allowed-roles gate.
//!
//! Membership is an exact match on [`Role`]. "Any resident" is spelled as
//! the three refinements via [`AllowedRoles::residents`].

use std::collections::HashSet;
use std::fmt;

use society_core::error::AppError;
use society_entity::{ResidentRole, Role};

/// A route's declared set of admitted roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedRoles {
    roles: HashSet<Role>,
}

impl AllowedRoles {
    /// Admit exactly the given roles.
    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Every role.
    pub fn any() -> Self {
        Self::only(Role::ALL)
    }

    /// Admins only.
    pub fn admins() -> Self {
        Self::only([Role::Admin])
    }

    /// Admins and guards.
    pub fn staff() -> Self {
        Self::only([Role::Admin, Role::Guard])
    }

    /// Owners, tenants, and family members.
    pub fn residents() -> Self {
        Self::only(ResidentRole::ALL.map(Role::Resident))
    }

    /// Add a role.
    pub fn with(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Whether `role` is admitted.
    pub fn admits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl fmt::Display for AllowedRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.roles.iter().map(Role::as_str).collect();
        names.sort_unstable();
        f.write_str(&names.join(", "))
    }
}

/// Admit `role` if it is in `allowed`, otherwise fail with `Forbidden`.
pub fn authorize(role: Role, allowed: &AllowedRoles) -> Result<(), AppError> {
    if allowed.admits(role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Role '{role}' is not allowed here; allowed: {allowed}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use society_core::ErrorKind;

    #[test]
    fn test_residents_admits_every_refinement_only() {
        let allowed = AllowedRoles::residents();
        for r in ResidentRole::ALL {
            assert!(authorize(Role::Resident(r), &allowed).is_ok());
        }
        assert!(authorize(Role::Admin, &allowed).is_err());
        assert!(authorize(Role::Guard, &allowed).is_err());
    }

    #[test]
    fn test_rejection_is_always_forbidden() {
        let sets = [
            AllowedRoles::admins(),
            AllowedRoles::staff(),
            AllowedRoles::residents(),
            AllowedRoles::only([Role::Resident(ResidentRole::Owner)]),
            AllowedRoles::only([]),
        ];
        for allowed in &sets {
            for role in Role::ALL {
                match authorize(role, allowed) {
                    Ok(()) => assert!(allowed.admits(role)),
                    Err(e) => {
                        assert!(!allowed.admits(role));
                        assert_eq!(e.kind, ErrorKind::Forbidden);
                    }
                }
            }
        }
    }

    #[test]
    fn test_exact_refinement() {
        let owners = AllowedRoles::only([Role::Resident(ResidentRole::Owner)]);
        assert!(authorize(Role::Resident(ResidentRole::Tenant), &owners).is_err());
        let owners_and_guards = owners.with(Role::Guard);
        assert!(owners_and_guards.admits(Role::Guard));
    }

    #[test]
    fn test_display_is_sorted() {
        assert_eq!(AllowedRoles::staff().to_string(), "Admin, Guard");
    }
}
