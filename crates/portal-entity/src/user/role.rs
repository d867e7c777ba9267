//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use portal_core::AppError;

/// Roles available in the portal, lowest privilege first.
///
/// The variant order matches the hierarchy table; levels and authorities
/// are looked up there, never stored on the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular account holder, read access only.
    User,
    /// Human resources, may edit profiles.
    Hr,
    /// Team manager, may edit profiles.
    Manager,
    /// Administrator, may create and edit users.
    Admin,
    /// Full control including deletion.
    SuperAdmin,
}

impl Role {
    /// Every role, lowest level first.
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Hr,
        Role::Manager,
        Role::Admin,
        Role::SuperAdmin,
    ];

    /// Return the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Hr => "HR",
            Self::Manager => "MANAGER",
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    /// Case-insensitive; an optional `ROLE_` prefix is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let name = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == name)
            .ok_or_else(|| {
                AppError::unknown_role(format!(
                    "Unknown role: '{s}'. Expected one of: USER, HR, MANAGER, ADMIN, SUPER_ADMIN"
                ))
            })
    }
}
