//! Request context carrying the acting user's identity and authorities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_auth::jwt::Claims;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_entity::user::{Role, User, authorities_of};

/// Context for the current authenticated request.
///
/// Built from validated token claims and passed into every service method,
/// so each operation knows who is acting without any ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting username (token subject).
    pub username: String,
    /// The actor's role at the time the token was issued.
    pub role: Role,
    /// The authorities carried by the token.
    pub authorities: Vec<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context from already validated token claims.
    ///
    /// A token whose authorities disagree with its role is refused.
    pub fn from_claims(claims: &Claims) -> AppResult<Self> {
        let expected = authorities_of(claims.role);
        if claims.authorities.len() != expected.len()
            || !expected
                .iter()
                .all(|a| claims.authorities.iter().any(|c| c == a))
        {
            return Err(AppError::token_invalid(
                "Token authorities do not match its role",
            ));
        }

        Ok(Self {
            username: claims.sub.clone(),
            role: claims.role,
            authorities: claims.authorities.clone(),
            request_time: Utc::now(),
        })
    }

    /// Creates a context acting as the given user.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            authorities: user.authorities().iter().map(|a| a.to_string()).collect(),
            request_time: Utc::now(),
        }
    }

    /// Whether the actor holds the authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }

    /// Whether the actor is the given account.
    pub fn is_self(&self, user: &User) -> bool {
        self.username == user.username
    }
}
