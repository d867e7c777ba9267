//! Authentication coordinator: login with lockout, plus administrative
//! unlock.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use portal_core::error::{AppError, ErrorKind};
use portal_core::result::AppResult;
use portal_core::traits::{CredentialVerifier, UserDirectory};
use portal_entity::user::User;

use crate::attempt::LoginAttemptCache;
use crate::jwt::{IssuedToken, TokenService};

/// Outward message for both unknown users and wrong passwords.
const INCORRECT_CREDENTIALS: &str = "Username / password incorrect. Please try again";
const ACCOUNT_DISABLED: &str =
    "Your account has been disabled. If this is an error, please contact administration";
const ACCOUNT_LOCKED: &str = "Your account has been locked. Please contact administration";

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Issued session token.
    pub token: IssuedToken,
    /// The authenticated user, with login timestamps already rotated.
    pub user: User,
}

/// Orchestrates credential checks, lockout bookkeeping, and token issuance.
#[derive(Clone)]
pub struct AuthenticationCoordinator {
    /// User directory.
    directory: Arc<dyn UserDirectory<User>>,
    /// Password verifier.
    verifier: Arc<dyn CredentialVerifier>,
    /// Failed-attempt counters.
    attempts: Arc<LoginAttemptCache>,
    /// Token issuer.
    tokens: Arc<TokenService>,
}

impl std::fmt::Debug for AuthenticationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationCoordinator")
            .field("max_attempts", &self.attempts.max_attempts())
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl AuthenticationCoordinator {
    /// Creates a new coordinator with all required dependencies.
    pub fn new(
        directory: Arc<dyn UserDirectory<User>>,
        verifier: Arc<dyn CredentialVerifier>,
        attempts: Arc<LoginAttemptCache>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            directory,
            verifier,
            attempts,
            tokens,
        }
    }

    /// The attempt cache, shared with administrative tooling.
    pub fn attempts(&self) -> &Arc<LoginAttemptCache> {
        &self.attempts
    }

    /// The token service, shared with request validation.
    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    /// Performs the complete login flow:
    ///
    /// 1. Find the user
    /// 2. Reject disabled accounts
    /// 3. Reject locked accounts while the attempt record is still exceeded,
    ///    otherwise unlock them
    /// 4. Verify the password, counting failures and locking at the threshold
    /// 5. Stamp the login, reset the attempt record, and issue a token
    ///
    /// Every write goes through [`UserDirectory::update`] and changes only
    /// the field it owns, so concurrent administrative changes survive.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginResult> {
        // Step 1: Find user
        let Some(user) = self
            .directory
            .find_by_username(username)
            .await
            .map_err(directory_error)?
        else {
            warn!(username = %username, "Login failed: unknown username");
            return Err(AppError::authentication_failed(INCORRECT_CREDENTIALS));
        };

        // Step 2: Disabled accounts never log in
        check_active(&user)?;

        // Step 3: Locked accounts heal once their attempt record is gone
        let user = if user.is_locked() {
            if self.attempts.has_exceeded_max_attempts(&user.username) {
                warn!(username = %user.username, "Login rejected: account locked");
                return Err(AppError::account_locked(ACCOUNT_LOCKED));
            }

            self.attempts.evict(&user.username);
            let healed = self
                .set_not_locked(&user.username, true)
                .await?
                .ok_or_else(|| AppError::authentication_failed(INCORRECT_CREDENTIALS))?;
            info!(username = %healed.username, "Lockout lapsed, account unlocked");
            healed
        } else {
            user
        };

        // Step 4: Verify password
        let matches = match self.verifier.verify(password, &user.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                error!(username = %user.username, error = %e, "Credential verification error");
                return Err(AppError::authentication_failed(INCORRECT_CREDENTIALS));
            }
        };

        if !matches {
            self.handle_failed_login(&user.username).await?;
            return Err(AppError::authentication_failed(INCORRECT_CREDENTIALS));
        }

        // Step 5: Success, stamped only if the stored record still allows it
        let now = Utc::now();
        let user = self
            .directory
            .update(
                &user.username,
                Box::new(move |stored: &mut User| {
                    if stored.active && !stored.is_locked() {
                        stored.record_login(now);
                    }
                }),
            )
            .await
            .map_err(directory_error)?
            .ok_or_else(|| AppError::authentication_failed(INCORRECT_CREDENTIALS))?;

        check_active(&user)?;
        if user.is_locked() {
            warn!(username = %user.username, "Login rejected: account locked during login");
            return Err(AppError::account_locked(ACCOUNT_LOCKED));
        }

        self.attempts.evict(&user.username);
        let token = self.tokens.issue(&user)?;

        info!(username = %user.username, role = %user.role, "Login successful");

        Ok(LoginResult { token, user })
    }

    /// Administrative unlock: forgets failed attempts and clears the locked
    /// flag. Returns the updated user.
    pub async fn unlock(&self, username: &str) -> AppResult<User> {
        let user = self
            .set_not_locked(username, true)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No user found by username: {username}")))?;

        self.attempts.evict(&user.username);

        info!(username = %user.username, "Account unlocked by administrator");
        Ok(user)
    }

    /// Records one failed attempt and locks the account once the threshold
    /// is reached.
    async fn handle_failed_login(&self, username: &str) -> AppResult<()> {
        let attempts = self.attempts.record_failure(username);
        warn!(
            username = %username,
            attempts,
            max_attempts = self.attempts.max_attempts(),
            "Login failed: bad credentials"
        );

        if attempts >= self.attempts.max_attempts() {
            self.set_not_locked(username, false).await?;
            warn!(username = %username, attempts, "Account locked after repeated failures");
        }

        Ok(())
    }

    /// Flips only the locked flag of the stored record.
    async fn set_not_locked(&self, username: &str, not_locked: bool) -> AppResult<Option<User>> {
        self.directory
            .update(
                username,
                Box::new(move |stored: &mut User| stored.not_locked = not_locked),
            )
            .await
            .map_err(directory_error)
    }
}

fn check_active(user: &User) -> AppResult<()> {
    if user.active {
        Ok(())
    } else {
        warn!(username = %user.username, "Login rejected: account disabled");
        Err(AppError::account_disabled(ACCOUNT_DISABLED))
    }
}

/// Directory failures surface as `DirectoryUnavailable`, keeping the
/// original message.
fn directory_error(err: AppError) -> AppError {
    if err.kind == ErrorKind::DirectoryUnavailable {
        err
    } else {
        AppError::directory_unavailable(format!("User directory error: {}", err.message))
    }
}
