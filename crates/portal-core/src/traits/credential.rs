//! Credential verification trait.

use crate::result::AppResult;

/// Checks a presented plaintext password against a stored hash.
pub trait CredentialVerifier: Send + Sync + std::fmt::Debug + 'static {
    /// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch.
    ///
    /// An `Err` means the hash itself could not be processed.
    fn verify(&self, password: &str, stored_hash: &str) -> AppResult<bool>;
}
