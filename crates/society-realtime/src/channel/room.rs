//! Room names.

use std::fmt;

use society_entity::{Principal, PrincipalId, PrincipalKind, Role};

/// A live channel room.
///
/// User rooms carry the principal kind so that equal ids from different
/// tables never share a room, while the wire name stays `user-<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomName {
    /// Every connected admin.
    Admins,
    /// Every connected guard.
    Guards,
    /// One principal's connections.
    User(PrincipalKind, PrincipalId),
}

impl RoomName {
    /// The shared room for a role, if the role has one.
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Admin => Some(Self::Admins),
            Role::Guard => Some(Self::Guards),
            Role::Resident(_) => None,
        }
    }

    /// The user room of a principal.
    pub fn for_principal(principal: &Principal) -> Self {
        Self::User(principal.role.kind(), principal.id)
    }

    /// Whether this is a role room.
    pub fn is_role_room(&self) -> bool {
        matches!(self, Self::Admins | Self::Guards)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admins => f.write_str("admins"),
            Self::Guards => f.write_str("guards"),
            Self::User(_, id) => write!(f, "user-{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use society_entity::ResidentRole;

    #[test]
    fn test_names() {
        assert_eq!(RoomName::Admins.to_string(), "admins");
        assert_eq!(RoomName::User(PrincipalKind::Resident, 42).to_string(), "user-42");
        assert_eq!(RoomName::for_role(Role::Guard), Some(RoomName::Guards));
        assert_eq!(RoomName::for_role(Role::Resident(ResidentRole::Owner)), None);
    }

    #[test]
    fn test_user_rooms_are_kind_scoped() {
        assert_ne!(
            RoomName::User(PrincipalKind::Admin, 1),
            RoomName::User(PrincipalKind::Resident, 1)
        );
    }
}
