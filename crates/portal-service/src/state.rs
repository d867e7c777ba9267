//! Shared service wiring for the support portal.

use std::sync::Arc;

use portal_auth::attempt::LoginAttemptCache;
use portal_auth::jwt::TokenService;
use portal_auth::login::{AuthenticationCoordinator, LoginResult};
use portal_auth::password::PasswordHasher;
use portal_core::config::AppConfig;
use portal_core::result::AppResult;
use portal_core::traits::UserDirectory;
use portal_entity::user::User;

use crate::context::RequestContext;
use crate::seed::ensure_super_admin;
use crate::user::UserService;

/// All long-lived services, built once from configuration.
///
/// Every field is `Arc`-wrapped so the state clones cheaply into tasks.
#[derive(Clone)]
pub struct PortalState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Password hasher (Argon2)
    pub hasher: Arc<PasswordHasher>,
    /// Failed-login counters
    pub attempts: Arc<LoginAttemptCache>,
    /// Token issuer and validator
    pub tokens: Arc<TokenService>,
    /// Login flow
    pub coordinator: Arc<AuthenticationCoordinator>,
    /// Account management
    pub users: Arc<UserService>,
    /// User directory
    directory: Arc<dyn UserDirectory<User>>,
}

impl PortalState {
    /// Wires every service over the given directory.
    ///
    /// Fails with a configuration error if the auth settings are unusable.
    pub fn new(config: AppConfig, directory: Arc<dyn UserDirectory<User>>) -> AppResult<Self> {
        config.validate()?;
        let hasher = Arc::new(PasswordHasher::new());
        let attempts = Arc::new(LoginAttemptCache::from_config(&config.auth)?);
        let tokens = Arc::new(TokenService::new(&config.auth)?);

        let coordinator = Arc::new(AuthenticationCoordinator::new(
            directory.clone(),
            hasher.clone(),
            attempts.clone(),
            tokens.clone(),
        ));

        let users = Arc::new(UserService::new(
            directory.clone(),
            hasher.clone(),
            attempts.clone(),
            config.auth.password_length,
            config.bootstrap.super_admin_username.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            hasher,
            attempts,
            tokens,
            coordinator,
            users,
            directory,
        })
    }

    /// Creates the super-admin account if it is missing.
    pub async fn bootstrap(&self) -> AppResult<User> {
        ensure_super_admin(self.directory.as_ref(), &self.hasher, &self.config.bootstrap).await
    }

    /// Authenticates a username and password.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        self.coordinator.authenticate(username, password).await
    }

    /// Validates a presented token and turns it into a request context.
    pub fn authorize(&self, token: &str) -> AppResult<RequestContext> {
        let claims = self.tokens.validate(token)?;
        RequestContext::from_claims(&claims)
    }
}

impl std::fmt::Debug for PortalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalState")
            .field("coordinator", &self.coordinator)
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}
