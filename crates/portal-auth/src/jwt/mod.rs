//! Session token claims, signing, and the token service.

pub mod claims;
pub mod service;
pub mod signer;

pub use claims::Claims;
pub use service::{IssuedToken, TokenService};
pub use signer::{JwtSigner, TokenSigner};
