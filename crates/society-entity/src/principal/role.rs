//! Role vocabulary.
//!
//! A single vocabulary is used end to end: tokens, the authorization gate,
//! room names, and stored rows all speak `Role`. "Resident" is never a role
//! value; it is the family of the three [`ResidentRole`] refinements and is
//! only ever checked through [`Role::is_resident`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use society_core::AppError;

/// Refinement of a resident principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "resident_role")]
pub enum ResidentRole {
    /// Owns the flat.
    Owner,
    /// Rents the flat.
    Tenant,
    /// Lives in the flat as a family member of the owner or tenant.
    #[sqlx(rename = "Family Member")]
    FamilyMember,
}

impl ResidentRole {
    /// All refinements, in declaration order.
    pub const ALL: [ResidentRole; 3] = [Self::Owner, Self::Tenant, Self::FamilyMember];

    /// Return the wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Tenant => "Tenant",
            Self::FamilyMember => "Family Member",
        }
    }
}

impl fmt::Display for ResidentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResidentRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Owner" => Ok(Self::Owner),
            "Tenant" => Ok(Self::Tenant),
            "Family Member" => Ok(Self::FamilyMember),
            _ => Err(AppError::validation(format!(
                "Invalid resident role: '{s}'. Expected one of: Owner, Tenant, Family Member"
            ))),
        }
    }
}

impl Serialize for ResidentRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResidentRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Which of the three disjoint tables a principal lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "principal_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    /// `admins` table.
    Admin,
    /// `guards` table.
    Guard,
    /// `residents` table.
    Resident,
}

impl PrincipalKind {
    /// Return the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Guard => "guard",
            Self::Resident => "resident",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Society administrator.
    Admin,
    /// Security guard.
    Guard,
    /// Any of the resident refinements.
    Resident(ResidentRole),
}

impl Role {
    /// Every concrete role value.
    pub const ALL: [Role; 5] = [
        Self::Admin,
        Self::Guard,
        Self::Resident(ResidentRole::Owner),
        Self::Resident(ResidentRole::Tenant),
        Self::Resident(ResidentRole::FamilyMember),
    ];

    /// Return the wire string carried in tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Guard => "Guard",
            Self::Resident(r) => r.as_str(),
        }
    }

    /// Whether this is any kind of resident.
    pub fn is_resident(&self) -> bool {
        matches!(self, Self::Resident(_))
    }

    /// Whether this is exactly the given role, refinement included.
    pub fn is_exactly(&self, other: Role) -> bool {
        *self == other
    }

    /// Whether this is the admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this is the guard role.
    pub fn is_guard(&self) -> bool {
        matches!(self, Self::Guard)
    }

    /// The table this role's principals are stored in.
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Self::Admin => PrincipalKind::Admin,
            Self::Guard => PrincipalKind::Guard,
            Self::Resident(_) => PrincipalKind::Resident,
        }
    }

    /// The shared live-channel room for this role, if the role has one.
    pub fn room(&self) -> Option<&'static str> {
        match self {
            Self::Admin => Some("admins"),
            Self::Guard => Some("guards"),
            Self::Resident(_) => None,
        }
    }

    /// Lenient parse used for live-channel `join-role` payloads.
    ///
    /// Accepts the exact wire strings plus lowercase and plural room forms
    /// (`"admin"`, `"admins"`, `"guards"`).
    pub fn from_room_hint(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "admins" => Some(Self::Admin),
            "guard" | "guards" => Some(Self::Guard),
            "owner" => Some(Self::Resident(ResidentRole::Owner)),
            "tenant" => Some(Self::Resident(ResidentRole::Tenant)),
            "family member" | "family_member" => Some(Self::Resident(ResidentRole::FamilyMember)),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    /// Strict parse of a wire string. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Guard" => Ok(Self::Guard),
            other => other.parse::<ResidentRole>().map(Self::Resident).map_err(|_| {
                AppError::validation(format!(
                    "Unknown role: '{s}'. Expected one of: Admin, Guard, Owner, Tenant, Family Member"
                ))
            }),
        }
    }
}

impl From<ResidentRole> for Role {
    fn from(role: ResidentRole) -> Self {
        Self::Resident(role)
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
