//! Bootstrap identity configuration.

use serde::{Deserialize, Serialize};

/// The designated super-admin account created on first start.
///
/// The username doubles as the protected identity that can never be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Username of the super-admin.
    #[serde(default = "default_username")]
    pub super_admin_username: String,
    /// Email of the super-admin.
    #[serde(default = "default_email")]
    pub super_admin_email: String,
    /// Initial password, only used when the account does not exist yet.
    #[serde(default = "default_password")]
    pub super_admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            super_admin_username: default_username(),
            super_admin_email: default_email(),
            super_admin_password: default_password(),
        }
    }
}

fn default_username() -> String {
    "supportPortal".to_string()
}

fn default_email() -> String {
    "admin@supportportal.com".to_string()
}

fn default_password() -> String {
    "supportPortal".to_string()
}
