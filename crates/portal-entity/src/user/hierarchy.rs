//! The constant role hierarchy table.
//!
//! Each role maps to a distinct level and a fixed authority set. The table
//! is a `static`, so lookups need no synchronization and never change at
//! runtime.

use portal_core::AppResult;

use super::role::Role;

/// Authority strings granted by roles.
pub mod authority {
    /// Read user records.
    pub const USER_READ: &str = "user:read";
    /// Create user records.
    pub const USER_CREATE: &str = "user:create";
    /// Update user records.
    pub const USER_UPDATE: &str = "user:update";
    /// Delete user records.
    pub const USER_DELETE: &str = "user:delete";
}

use authority::{USER_CREATE, USER_DELETE, USER_READ, USER_UPDATE};

/// One row of the hierarchy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGrant {
    /// The role this row describes.
    pub role: Role,
    /// Ordinal level, strictly increasing along the table.
    pub level: u8,
    /// Authorities granted to the role.
    pub authorities: &'static [&'static str],
}

/// Indexed by `Role as usize`.
static ROLE_TABLE: [RoleGrant; 5] = [
    RoleGrant {
        role: Role::User,
        level: 1,
        authorities: &[USER_READ],
    },
    RoleGrant {
        role: Role::Hr,
        level: 2,
        authorities: &[USER_READ, USER_UPDATE],
    },
    RoleGrant {
        role: Role::Manager,
        level: 3,
        authorities: &[USER_READ, USER_UPDATE],
    },
    RoleGrant {
        role: Role::Admin,
        level: 4,
        authorities: &[USER_READ, USER_CREATE, USER_UPDATE],
    },
    RoleGrant {
        role: Role::SuperAdmin,
        level: 5,
        authorities: &[USER_READ, USER_CREATE, USER_UPDATE, USER_DELETE],
    },
];

/// Returns the full table, lowest level first.
pub fn role_table() -> &'static [RoleGrant] {
    &ROLE_TABLE
}

/// Returns the ordinal level of a role.
pub fn level_of(role: Role) -> u8 {
    ROLE_TABLE[role.index()].level
}

/// Returns the authorities granted to a role.
pub fn authorities_of(role: Role) -> &'static [&'static str] {
    ROLE_TABLE[role.index()].authorities
}

/// Checks whether a role grants the given authority.
pub fn has_authority(role: Role, authority: &str) -> bool {
    authorities_of(role).contains(&authority)
}

/// Resolves a role by name, case-insensitively.
///
/// Fails with `ErrorKind::UnknownRole` if the name matches no role.
pub fn role_from_name(name: &str) -> AppResult<Role> {
    name.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_rows_match_roles() {
        for (index, grant) in ROLE_TABLE.iter().enumerate() {
            assert_eq!(grant.role.index(), index);
        }
    }

    #[test]
    fn test_levels_strictly_increasing() {
        let levels: Vec<u8> = Role::ALL.iter().map(|r| level_of(*r)).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5]);
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_authorities() {
        assert!(has_authority(Role::SuperAdmin, authority::USER_DELETE));
        assert!(!has_authority(Role::Admin, authority::USER_DELETE));
        assert!(has_authority(Role::Admin, authority::USER_CREATE));
        assert!(!has_authority(Role::Manager, authority::USER_CREATE));
        assert!(has_authority(Role::Hr, authority::USER_UPDATE));
        assert_eq!(authorities_of(Role::User), &["user:read"]);
    }

    #[test]
    fn test_role_from_name_unknown() {
        assert!(role_from_name("guest").is_err());
        assert_eq!(role_from_name("super_admin").unwrap(), Role::SuperAdmin);
    }
}
