//! # portal-auth
//!
//! The trust-and-access core of the support portal.
//!
//! ## Modules
//!
//! - `rbac`: role hierarchy lookups and the authorization engine
//! - `attempt`: concurrent failed-login counter with lockout threshold
//! - `jwt`: signed, time-bounded session token issuance and validation
//! - `password`: Argon2id hashing and generated credentials
//! - `login`: the authentication coordinator tying the above together

pub mod attempt;
pub mod jwt;
pub mod login;
pub mod password;
pub mod rbac;

pub use attempt::LoginAttemptCache;
pub use jwt::{Claims, IssuedToken, JwtSigner, TokenService, TokenSigner};
pub use login::{AuthenticationCoordinator, LoginResult};
pub use password::PasswordHasher;
pub use rbac::AuthorizationEngine;
