//! User management: registration, administrative CRUD, and password
//! resets, gated by the role hierarchy.

use std::sync::Arc;

use tracing::{info, warn};

use portal_auth::attempt::LoginAttemptCache;
use portal_auth::password::{PasswordHasher, generate_password, generate_user_id};
use portal_auth::rbac::AuthorizationEngine;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_core::traits::UserDirectory;
use portal_entity::user::{Role, User, level_of};

use crate::context::RequestContext;

/// Handles account management on behalf of an authenticated actor.
#[derive(Clone)]
pub struct UserService {
    /// User directory.
    directory: Arc<dyn UserDirectory<User>>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Failed-login counters, kept keyed by the current username.
    attempts: Arc<LoginAttemptCache>,
    /// Role hierarchy checks.
    engine: AuthorizationEngine,
    /// Length of generated passwords.
    password_length: usize,
    /// The protected super-admin username.
    super_admin_username: String,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("password_length", &self.password_length)
            .field("super_admin_username", &self.super_admin_username)
            .finish()
    }
}

/// Request to create an account on behalf of an administrator.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NewUserRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Username (unique).
    pub username: String,
    /// Email (unique).
    pub email: String,
    /// Role name, e.g. `ROLE_MANAGER` or `manager`.
    pub role: String,
    /// Whether the account starts enabled.
    pub active: bool,
    /// Whether the account starts unlocked.
    pub not_locked: bool,
}

/// Request to change an existing account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UpdateUserRequest {
    /// Username of the account being changed.
    pub current_username: String,
    /// New given name.
    pub first_name: String,
    /// New family name.
    pub last_name: String,
    /// New username.
    pub username: String,
    /// New email.
    pub email: String,
    /// Requested role name.
    pub role: String,
    /// New enabled flag. Ignored when editing oneself.
    pub active: bool,
    /// New unlocked flag. Ignored when editing oneself.
    pub not_locked: bool,
}

/// A stored account together with its generated plaintext password.
///
/// The password is handed back once so it can be delivered to the owner.
#[derive(Debug, Clone)]
pub struct ProvisionedUser {
    /// The stored account.
    pub user: User,
    /// The generated password.
    pub password: String,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        directory: Arc<dyn UserDirectory<User>>,
        hasher: Arc<PasswordHasher>,
        attempts: Arc<LoginAttemptCache>,
        password_length: usize,
        super_admin_username: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            hasher,
            attempts,
            engine: AuthorizationEngine::new(),
            password_length,
            super_admin_username: super_admin_username.into(),
        }
    }

    /// Self-service sign-up. The account always receives the `USER` role
    /// and a generated password.
    pub async fn register(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
    ) -> AppResult<ProvisionedUser> {
        validate_identity(username, email)?;
        self.ensure_unique(None, username, email).await?;

        let provisioned = self
            .provision(first_name, last_name, username, email, Role::User, true, true)
            .await?;

        info!(username = %username, "User registered");
        Ok(provisioned)
    }

    /// Creates an account with the requested role.
    pub async fn add_new_user(
        &self,
        ctx: &RequestContext,
        req: NewUserRequest,
    ) -> AppResult<ProvisionedUser> {
        let role = self.engine.can_create_named(ctx.role, &req.role)?;
        validate_identity(&req.username, &req.email)?;
        self.ensure_unique(None, &req.username, &req.email).await?;

        let provisioned = self
            .provision(
                &req.first_name,
                &req.last_name,
                &req.username,
                &req.email,
                role,
                req.active,
                req.not_locked,
            )
            .await?;

        info!(
            actor = %ctx.username,
            username = %req.username,
            role = %role,
            "User created"
        );
        Ok(provisioned)
    }

    /// Updates an account's names, identity, role, and flags.
    ///
    /// Only the requested fields are written; anything else on the stored
    /// record, such as a lock applied since the lookup, is left alone. A
    /// rename carries the account's failed-login record to the new name.
    pub async fn update_user(&self, ctx: &RequestContext, req: UpdateUserRequest) -> AppResult<User> {
        let user = self.find_by_username(&req.current_username).await?;
        let is_self = ctx.is_self(&user);

        let role = self
            .engine
            .can_update_named(ctx.role, is_self, user.role, &req.role)?;

        if !is_self && ctx.role != Role::SuperAdmin && level_of(user.role) > level_of(ctx.role) {
            return Err(AppError::insufficient_privilege(format!(
                "Cannot modify a user with a higher role than your own. Your role: {}, user role: {}",
                ctx.role, user.role
            )));
        }

        validate_identity(&req.username, &req.email)?;
        self.ensure_unique(Some(&user), &req.username, &req.email)
            .await?;

        let UpdateUserRequest {
            current_username,
            first_name,
            last_name,
            username,
            email,
            active,
            not_locked,
            ..
        } = req;
        let apply = move |stored: &mut User| {
            stored.first_name = first_name;
            stored.last_name = last_name;
            stored.username = username;
            stored.email = email;
            stored.role = role;
            if !is_self {
                stored.active = active;
                stored.not_locked = not_locked;
            }
        };
        let user = self
            .directory
            .update(&current_username, Box::new(apply))
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No user found by username: {current_username}"))
            })?;

        if user.username != current_username {
            self.attempts.rename(&current_username, &user.username);
        }

        info!(
            actor = %ctx.username,
            username = %user.username,
            role = %user.role,
            "User updated"
        );
        Ok(user)
    }

    /// Deletes an account. The super-admin account and the actor's own
    /// account can never be deleted.
    pub async fn delete_user(&self, ctx: &RequestContext, username: &str) -> AppResult<()> {
        self.engine.can_delete(ctx.authorities.as_slice())?;

        let user = self.find_by_username(username).await?;

        if user.username == self.super_admin_username {
            warn!(actor = %ctx.username, "Refused deletion of the super-admin account");
            return Err(AppError::insufficient_privilege(
                "The super-admin account cannot be deleted",
            ));
        }

        if ctx.is_self(&user) {
            return Err(AppError::insufficient_privilege(
                "You cannot delete your own account",
            ));
        }

        self.directory.delete(&user).await?;
        self.attempts.evict(&user.username);

        info!(actor = %ctx.username, username = %user.username, "User deleted");
        Ok(())
    }

    /// Replaces the password of the account registered under `email` with a
    /// generated one.
    pub async fn reset_password(&self, email: &str) -> AppResult<ProvisionedUser> {
        let user = self.find_by_email(email).await?;

        let password = generate_password(self.password_length);
        let password_hash = self.hasher.hash_password(&password)?;
        let user = self
            .directory
            .update(
                &user.username,
                Box::new(move |stored: &mut User| stored.password_hash = password_hash),
            )
            .await?
            .ok_or_else(|| AppError::not_found(format!("No user found for email: {email}")))?;

        info!(username = %user.username, "Password reset");
        Ok(ProvisionedUser { user, password })
    }

    /// Lists the accounts visible to the actor. Plain users only see
    /// themselves.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        if ctx.role == Role::User {
            return Ok(vec![self.find_by_username(&ctx.username).await?]);
        }

        self.directory.find_all().await
    }

    /// Looks up an account by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<User> {
        self.directory
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No user found by username: {username}")))
    }

    /// Looks up an account by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<User> {
        self.directory
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No user found for email: {email}")))
    }

    /// Fails with `Conflict` if another account already holds the username
    /// or email. `current` is the account being edited, if any.
    async fn ensure_unique(&self, current: Option<&User>, username: &str, email: &str) -> AppResult<()> {
        let is_other = |found: &User| current.is_none_or(|c| c.id != found.id);

        if let Some(existing) = self.directory.find_by_username(username).await? {
            if is_other(&existing) {
                return Err(AppError::conflict("Username already exists"));
            }
        }

        if let Some(existing) = self.directory.find_by_email(email).await? {
            if is_other(&existing) {
                return Err(AppError::conflict("Email already exists"));
            }
        }

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn provision(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        role: Role,
        active: bool,
        not_locked: bool,
    ) -> AppResult<ProvisionedUser> {
        let password = generate_password(self.password_length);
        let mut user = User::new(
            generate_user_id(),
            username,
            email,
            self.hasher.hash_password(&password)?,
            role,
        )
        .with_names(first_name, last_name);
        user.active = active;
        user.not_locked = not_locked;

        let user = self.directory.save(&user).await?;
        Ok(ProvisionedUser { user, password })
    }
}

fn validate_identity(username: &str, email: &str) -> AppResult<()> {
    if username.trim().is_empty() {
        return Err(AppError::validation("Username cannot be empty"));
    }
    if !email.contains('@') {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(())
}
