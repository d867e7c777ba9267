//! JWT claims structure carried by every session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_entity::user::Role;

/// Claims payload embedded in every session token.
///
/// Claims are fixed at issuance. The authority set is the role's authority
/// set at that moment; a later role change only shows up in tokens issued
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the username).
    pub sub: String,
    /// Role held at issuance.
    pub role: Role,
    /// Authorities granted by `role` at issuance.
    pub authorities: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
}

impl Claims {
    /// Returns the username from the subject claim.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns the issuance time.
    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Checks whether the token is still valid at `now` (inclusive).
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() <= self.exp
    }

    /// Checks whether the claims grant an authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Returns the remaining TTL in seconds at `now` (0 if expired).
    pub fn remaining_ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        let remaining = self.exp - now.timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}
