//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use portal_core::config::AppConfig;
use portal_core::traits::UserDirectory;
use portal_directory::MemoryUserDirectory;
use portal_entity::user::{Role, User};
use portal_service::{PortalState, RequestContext};

/// Test application context
pub struct TestApp {
    /// Wired services
    pub state: PortalState,
    /// Direct handle on the directory for assertions
    pub directory: Arc<MemoryUserDirectory>,
}

impl TestApp {
    /// Create a new test application with a seeded super-admin.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application over the given configuration.
    pub async fn with_config(config: AppConfig) -> Self {
        let directory = Arc::new(MemoryUserDirectory::new());
        let state = PortalState::new(config, directory.clone()).expect("Invalid test config");
        state.bootstrap().await.expect("Failed to seed super-admin");
        Self { state, directory }
    }

    /// Create an active, unlocked user with a known password.
    pub async fn create_test_user(&self, username: &str, password: &str, role: Role) -> User {
        let hash = self
            .state
            .hasher
            .hash_password(password)
            .expect("Failed to hash password");
        let user = User::new(
            "1234567890",
            username,
            format!("{username}@example.com"),
            hash,
            role,
        );
        self.directory
            .save(&user)
            .await
            .expect("Failed to save test user")
    }

    /// Fetch a user straight from the directory.
    pub async fn user(&self, username: &str) -> User {
        self.directory
            .find_by_username(username)
            .await
            .expect("Directory lookup failed")
            .expect("User not found")
    }

    /// Log in and return a request context built from the issued token.
    pub async fn login_as(&self, username: &str, password: &str) -> RequestContext {
        let result = self
            .state
            .login(username, password)
            .await
            .expect("Login failed");
        self.state
            .authorize(&result.token.token)
            .expect("Token rejected")
    }
}

/// Configuration used by integration tests.
pub fn test_config() -> AppConfig {
    AppConfig::from_toml(
        r#"
        [auth]
        jwt_secret = "integration-test-secret"
        max_failed_attempts = 5
        attempt_window_minutes = 15

        [bootstrap]
        super_admin_password = "root-password"
        "#,
    )
    .expect("Failed to parse test config")
}
