//! Super-admin bootstrap.

use tracing::{debug, info};

use portal_auth::password::{PasswordHasher, generate_user_id};
use portal_core::config::BootstrapConfig;
use portal_core::result::AppResult;
use portal_core::traits::UserDirectory;
use portal_entity::user::{Role, User};

/// Makes sure the configured super-admin account exists.
///
/// An existing account is returned untouched, so restarts never reset its
/// password or flags.
pub async fn ensure_super_admin(
    directory: &dyn UserDirectory<User>,
    hasher: &PasswordHasher,
    config: &BootstrapConfig,
) -> AppResult<User> {
    if let Some(existing) = directory
        .find_by_username(&config.super_admin_username)
        .await?
    {
        debug!(username = %existing.username, "Super-admin already present");
        return Ok(existing);
    }

    let user = User::new(
        generate_user_id(),
        config.super_admin_username.as_str(),
        config.super_admin_email.as_str(),
        hasher.hash_password(&config.super_admin_password)?,
        Role::SuperAdmin,
    )
    .with_names("Super", "Admin");

    let user = directory.save(&user).await?;
    info!(username = %user.username, "Super-admin account created");
    Ok(user)
}
