//! Unified application error types for the support portal.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] carries the
//! trust-and-access taxonomy so callers can branch on the outcome without
//! string matching.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Bad credentials or unknown user. The two are deliberately not
    /// distinguished outward.
    AuthenticationFailed,
    /// The account has been deactivated.
    AccountDisabled,
    /// The account is locked after too many failed attempts.
    AccountLocked,
    /// A role name did not match any known role.
    UnknownRole,
    /// The actor lacks the authority or level for the operation.
    InsufficientPrivilege,
    /// The operation would grant a role above what the actor may grant.
    RoleEscalationDenied,
    /// The token is malformed or its signature does not verify.
    TokenInvalid,
    /// The token's expiry instant has passed.
    TokenExpired,
    /// The user directory failed to answer a lookup or save.
    DirectoryUnavailable,
    /// The requested resource was not found.
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed => write!(f, "AUTHENTICATION_FAILED"),
            Self::AccountDisabled => write!(f, "ACCOUNT_DISABLED"),
            Self::AccountLocked => write!(f, "ACCOUNT_LOCKED"),
            Self::UnknownRole => write!(f, "UNKNOWN_ROLE"),
            Self::InsufficientPrivilege => write!(f, "INSUFFICIENT_PRIVILEGE"),
            Self::RoleEscalationDenied => write!(f, "ROLE_ESCALATION_DENIED"),
            Self::TokenInvalid => write!(f, "TOKEN_INVALID"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::DirectoryUnavailable => write!(f, "DIRECTORY_UNAVAILABLE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl ErrorKind {
    /// Whether this kind is an authorization denial from the role engine.
    pub fn is_denial(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPrivilege | Self::RoleEscalationDenied | Self::UnknownRole
        )
    }

    /// Whether this kind rejects a presented credential or token.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed
                | Self::AccountDisabled
                | Self::AccountLocked
                | Self::TokenInvalid
                | Self::TokenExpired
                | Self::DirectoryUnavailable
        )
    }
}

/// The unified application error used throughout the portal.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication-failed error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationFailed, message)
    }

    /// Create an account-disabled error.
    pub fn account_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountDisabled, message)
    }

    /// Create an account-locked error.
    pub fn account_locked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountLocked, message)
    }

    /// Create an unknown-role error.
    pub fn unknown_role(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownRole, message)
    }

    /// Create an insufficient-privilege error.
    pub fn insufficient_privilege(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientPrivilege, message)
    }

    /// Create a role-escalation-denied error.
    pub fn role_escalation_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RoleEscalationDenied, message)
    }

    /// Create a token-invalid error.
    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenInvalid, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a directory-unavailable error.
    pub fn directory_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DirectoryUnavailable, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
