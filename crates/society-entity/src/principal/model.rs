//! Principal entity models.
//!
//! Admins, guards, and residents are rows in three disjoint tables with
//! their own id spaces. A [`Principal`] is the resolved identity handed to
//! request handlers: the row's columns merged with the role that the
//! identity resolver attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::flat::FlatKey;
use super::role::{PrincipalKind, ResidentRole, Role};

/// Numeric principal identifier. Unique only within its own table.
pub type PrincipalId = i64;

/// A row of the admins table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    /// Row id.
    pub id: PrincipalId,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub contact: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// A row of the guards table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Guard {
    /// Row id.
    pub id: PrincipalId,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub contact: Option<String>,
    /// Assigned shift, e.g. `"night"`.
    pub shift: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// A row of the residents table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resident {
    /// Row id.
    pub id: PrincipalId,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub contact: Option<String>,
    /// Stored role refinement.
    pub role: ResidentRole,
    /// Building wing.
    pub wing: String,
    /// Unit number.
    pub unit_number: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl Resident {
    /// The resident's flat key, if wing and unit form a valid one.
    pub fn flat_key(&self) -> Option<FlatKey> {
        FlatKey::new(&self.wing, &self.unit_number).ok()
    }
}

/// A row fetched from exactly one of the three principal tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PrincipalRecord {
    /// Admin row.
    Admin(Admin),
    /// Guard row.
    Guard(Guard),
    /// Resident row.
    Resident(Resident),
}

impl PrincipalRecord {
    /// Row id.
    pub fn id(&self) -> PrincipalId {
        match self {
            Self::Admin(a) => a.id,
            Self::Guard(g) => g.id,
            Self::Resident(r) => r.id,
        }
    }

    /// Which table the row came from.
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Self::Admin(_) => PrincipalKind::Admin,
            Self::Guard(_) => PrincipalKind::Guard,
            Self::Resident(_) => PrincipalKind::Resident,
        }
    }

    /// Login email.
    pub fn email(&self) -> &str {
        match self {
            Self::Admin(a) => &a.email,
            Self::Guard(g) => &g.email,
            Self::Resident(r) => &r.email,
        }
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &str {
        match self {
            Self::Admin(a) => &a.password_hash,
            Self::Guard(g) => &g.password_hash,
            Self::Resident(r) => &r.password_hash,
        }
    }

    /// The role implied by the row itself.
    pub fn stored_role(&self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Guard(_) => Role::Guard,
            Self::Resident(r) => Role::Resident(r.role),
        }
    }
}

/// Input for creating a principal row.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    /// Role; decides the target table.
    pub role: Role,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub contact: Option<String>,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Flat key. Required for residents, ignored otherwise.
    pub flat: Option<FlatKey>,
    /// Guard shift. Ignored for other roles.
    pub shift: Option<String>,
}

/// An authenticated actor with its role attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Row id within the principal's own table.
    pub id: PrincipalId,
    /// Resolved role.
    pub role: Role,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Contact number.
    pub contact: Option<String>,
    /// Flat key, for residents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat: Option<FlatKey>,
}

impl Principal {
    /// Merge a fetched row with the role chosen by the resolver.
    pub fn from_record(record: PrincipalRecord, role: Role) -> Self {
        match record {
            PrincipalRecord::Admin(a) => Self {
                id: a.id,
                role,
                email: a.email,
                name: a.name,
                contact: a.contact,
                flat: None,
            },
            PrincipalRecord::Guard(g) => Self {
                id: g.id,
                role,
                email: g.email,
                name: g.name,
                contact: g.contact,
                flat: None,
            },
            PrincipalRecord::Resident(r) => {
                let flat = r.flat_key();
                Self {
                    id: r.id,
                    role,
                    email: r.email,
                    name: r.name,
                    contact: r.contact,
                    flat,
                }
            }
        }
    }

    /// Name of this principal's user room on the live channel.
    pub fn user_room(&self) -> String {
        format!("user-{}", self.id)
    }
}
