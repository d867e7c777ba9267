//! Login flow: credential checks, lockout, and token issuance.

pub mod coordinator;

pub use coordinator::{AuthenticationCoordinator, LoginResult};
