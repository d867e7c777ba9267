//! Collaborator traits defined in `portal-core` and implemented by other crates.

pub mod credential;
pub mod directory;

pub use credential::CredentialVerifier;
pub use directory::UserDirectory;
