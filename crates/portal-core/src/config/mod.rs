//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default so an empty source still
//! yields a usable configuration.

pub mod auth;
pub mod bootstrap;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::bootstrap::BootstrapConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Authentication, token, and lockout settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Super-admin identity seeded at startup.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PORTAL__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PORTAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML string. Used by tests and tools
    /// that carry their configuration inline.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that deserialize but cannot be used.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.auth.max_failed_attempts, 5);
        assert_eq!(config.auth.attempt_window_minutes, 15);
        assert_eq!(config.auth.token_ttl_minutes, 7200);
        assert_eq!(config.auth.token_header, "Jwt-Token");
        assert_eq!(config.bootstrap.super_admin_username, "supportPortal");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_toml(
            r#"
            [auth]
            max_failed_attempts = 3
            jwt_secret = "test-secret"

            [logging]
            format = "pretty"
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.max_failed_attempts, 3);
        assert_eq!(config.auth.jwt_secret, "test-secret");
        assert_eq!(config.auth.attempt_window_minutes, 15);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_out_of_range_durations_are_rejected() {
        for source in [
            "[auth]\ntoken_ttl_minutes = 18446744073709551615",
            "[auth]\ntoken_ttl_minutes = 1000000000000000",
            "[auth]\ntoken_ttl_minutes = 0",
            "[auth]\nattempt_window_minutes = 1000000000000000",
        ] {
            let err = AppConfig::from_toml(source).unwrap_err();
            assert_eq!(err.kind, crate::error::ErrorKind::Configuration, "{source}");
        }
    }

    #[test]
    fn test_duration_accessors() {
        let config = AppConfig::from_toml(
            "[auth]\ntoken_ttl_minutes = 60\nattempt_window_minutes = 0",
        )
        .unwrap();
        assert_eq!(config.auth.token_ttl().unwrap(), chrono::Duration::minutes(60));
        assert_eq!(config.auth.attempt_window().unwrap(), None);

        let huge = AuthConfig {
            attempt_window_minutes: u64::MAX,
            ..AuthConfig::default()
        };
        assert!(huge.attempt_window().is_err());
        assert!(huge.validate().is_err());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let err = AppConfig::from_toml("[auth]\njwt_secret = \"\"").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_type_is_configuration_error() {
        let err = AppConfig::from_toml("[auth]\nmax_failed_attempts = \"many\"").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
