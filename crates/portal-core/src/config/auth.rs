//! Authentication configuration.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Token, credential, and lockout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA512).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token time-to-live in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Issuer claim written into and required from every token.
    #[serde(default = "default_issuer")]
    pub token_issuer: String,
    /// Audience claim written into and required from every token.
    #[serde(default = "default_audience")]
    pub token_audience: String,
    /// Name of the header the token travels under.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Failed login attempts before the account is locked.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Minutes an attempt record survives after its last failure.
    /// `0` keeps records until evicted.
    #[serde(default = "default_attempt_window")]
    pub attempt_window_minutes: u64,
    /// Length of generated passwords.
    #[serde(default = "default_password_length")]
    pub password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            token_issuer: default_issuer(),
            token_audience: default_audience(),
            token_header: default_token_header(),
            max_failed_attempts: default_max_failed(),
            attempt_window_minutes: default_attempt_window(),
            password_length: default_password_length(),
        }
    }
}

impl AuthConfig {
    /// Token lifetime. Fails if it is zero or an expiry computed from now
    /// would not be representable.
    pub fn token_ttl(&self) -> AppResult<Duration> {
        let ttl = minutes("token_ttl_minutes", self.token_ttl_minutes)?;
        if ttl.is_zero() {
            return Err(AppError::configuration(
                "auth.token_ttl_minutes must be at least 1",
            ));
        }
        Ok(ttl)
    }

    /// Attempt record lifetime; `None` when records never expire.
    pub fn attempt_window(&self) -> AppResult<Option<Duration>> {
        match self.attempt_window_minutes {
            0 => Ok(None),
            value => minutes("attempt_window_minutes", value).map(Some),
        }
    }

    /// Checks the settings that cannot be expressed in their serde types.
    pub fn validate(&self) -> AppResult<()> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        self.token_ttl()?;
        self.attempt_window()?;
        Ok(())
    }
}

/// Converts a minute count into a duration that can still be added to the
/// current time.
fn minutes(field: &str, value: u64) -> AppResult<Duration> {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_minutes)
        .filter(|duration| Utc::now().checked_add_signed(*duration).is_some())
        .ok_or_else(|| AppError::configuration(format!("auth.{field} is out of range: {value}")))
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    // 5 days
    7200
}

fn default_issuer() -> String {
    "support-portal".to_string()
}

fn default_audience() -> String {
    "support-portal-users".to_string()
}

fn default_token_header() -> String {
    "Jwt-Token".to_string()
}

fn default_max_failed() -> u32 {
    5
}

fn default_attempt_window() -> u64 {
    15
}

fn default_password_length() -> usize {
    10
}
