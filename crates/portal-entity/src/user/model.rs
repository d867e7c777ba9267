//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hierarchy;
use super::role::Role;

/// An account held by the user directory.
///
/// The authority set is never stored: it is always read from the role
/// hierarchy for the current [`Role`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable internal identifier.
    pub id: Uuid,
    /// Public, human-facing account number.
    pub user_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique login name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Current role.
    pub role: Role,
    /// Whether the account is enabled.
    pub active: bool,
    /// Cleared when the lockout threshold is reached.
    pub not_locked: bool,
    /// When the account was created.
    pub join_date: DateTime<Utc>,
    /// Most recent successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// The login before the most recent one, shown to the user as
    /// "last seen".
    pub last_login_display_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create an active, unlocked account with the given role.
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            first_name: String::new(),
            last_name: String::new(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            active: true,
            not_locked: true,
            join_date: Utc::now(),
            last_login_at: None,
            last_login_display_at: None,
        }
    }

    /// Set the display names.
    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Authorities granted by the current role.
    pub fn authorities(&self) -> &'static [&'static str] {
        hierarchy::authorities_of(self.role)
    }

    /// Check whether the current role grants an authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        hierarchy::has_authority(self.role, authority)
    }

    /// Check if the account is currently locked.
    pub fn is_locked(&self) -> bool {
        !self.not_locked
    }

    /// Shift the previous login into the display slot and stamp a new one.
    pub fn record_login(&mut self, at: DateTime<Utc>) {
        self.last_login_display_at = self.last_login_at;
        self.last_login_at = Some(at);
    }
}
