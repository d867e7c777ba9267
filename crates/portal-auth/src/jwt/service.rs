//! Token service: issues session tokens at login and validates them on
//! later requests without consulting the user directory.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use portal_core::config::AuthConfig;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_entity::user::User;

use super::claims::Claims;
use super::signer::{JwtSigner, TokenSigner};

/// A freshly issued token together with its transport header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Header the token travels under.
    pub header_name: String,
    /// The encoded, signed token.
    pub token: String,
    /// Expiration instant.
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates signed, time-bounded session tokens.
///
/// Validation is self-contained: a token stays valid until it expires, even
/// if the account is later locked or deleted.
#[derive(Debug, Clone)]
pub struct TokenService {
    /// Signing primitive.
    signer: Arc<dyn TokenSigner>,
    /// Token lifetime.
    ttl: Duration,
    /// Issuer claim.
    issuer: String,
    /// Audience claim.
    audience: String,
    /// Transport header name.
    header_name: String,
}

impl TokenService {
    /// Creates a token service signing HMAC-SHA512 JWTs.
    ///
    /// Fails with a configuration error if the token lifetime is unusable.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        Self::with_signer(Arc::new(JwtSigner::new(config)), config)
    }

    /// Creates a token service over a custom signer.
    pub fn with_signer(signer: Arc<dyn TokenSigner>, config: &AuthConfig) -> AppResult<Self> {
        Ok(Self {
            signer,
            ttl: config.token_ttl()?,
            issuer: config.token_issuer.clone(),
            audience: config.token_audience.clone(),
            header_name: config.token_header.clone(),
        })
    }

    /// The header name tokens travel under.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// The configured token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for the user, valid from now.
    pub fn issue(&self, user: &User) -> AppResult<IssuedToken> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token for the user as if issued at `now`.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::internal("Token expiry out of range"))?;
        let claims = Claims {
            sub: user.username.clone(),
            role: user.role,
            authorities: user.authorities().iter().map(|a| a.to_string()).collect(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = self.signer.sign(&claims)?;

        Ok(IssuedToken {
            header_name: self.header_name.clone(),
            token,
            expires_at,
        })
    }

    /// Validates a token against the current time.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        self.validate_at(token, Utc::now())
    }

    /// Validates a token as of `now`.
    ///
    /// The signature is checked first; only a genuine token can be reported
    /// as expired.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Claims> {
        let claims = self.signer.verify(token.trim())?;

        if !claims.is_live_at(now) {
            return Err(AppError::token_expired("Token has expired"));
        }

        Ok(claims)
    }
}
