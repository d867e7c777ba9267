//! Token signing primitive: turns claims into a signed string and back.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use portal_core::config::AuthConfig;
use portal_core::error::AppError;
use portal_core::result::AppResult;

use super::claims::Claims;

/// Message for every verification failure, so callers cannot tell which
/// check rejected the token.
const INVALID_TOKEN: &str = "Token cannot be verified";

/// Narrow signing interface used by the token service.
///
/// `verify` checks integrity and authenticity only. Expiry is judged by
/// the caller against its own clock.
pub trait TokenSigner: Send + Sync + std::fmt::Debug + 'static {
    /// Signs the claims and returns the encoded token.
    fn sign(&self, claims: &Claims) -> AppResult<String>;

    /// Verifies the signature and decodes the claims.
    ///
    /// Fails with `ErrorKind::TokenInvalid` on any malformed input or
    /// signature mismatch.
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

/// HMAC-SHA512 JWT signer.
#[derive(Clone)]
pub struct JwtSigner {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature, issuer, and audience checks. Expiry is left to the caller.
    validation: Validation,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtSigner {
    /// Creates a signer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_issuer(&[&config.token_issuer]);
        validation.set_audience(&[&config.token_audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, claims: &Claims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS512), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(reason = ?e.kind(), "Token verification failed");
                AppError::token_invalid(INVALID_TOKEN)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_core::ErrorKind;
    use portal_entity::user::Role;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            ..AuthConfig::default()
        }
    }

    fn claims(config: &AuthConfig) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: "alice".to_string(),
            role: Role::User,
            authorities: vec!["user:read".to_string()],
            iat: now,
            exp: now + 60,
            iss: config.token_issuer.clone(),
            aud: config.token_audience.clone(),
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let config = config("secret-one");
        let signer = JwtSigner::new(&config);
        let original = claims(&config);
        let token = signer.sign(&original).unwrap();
        assert_eq!(signer.verify(&token).unwrap(), original);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let config_a = config("secret-one");
        let token = JwtSigner::new(&config_a).sign(&claims(&config_a)).unwrap();
        let err = JwtSigner::new(&config("secret-two")).verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_garbage_is_invalid() {
        let signer = JwtSigner::new(&config("secret-one"));
        for input in ["", "not-a-token", "a.b.c", "....."] {
            let err = signer.verify(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::TokenInvalid);
            assert_eq!(err.message, INVALID_TOKEN);
        }
    }

    #[test]
    fn test_foreign_issuer_is_invalid() {
        let config = config("secret-one");
        let signer = JwtSigner::new(&config);
        let mut foreign = claims(&config);
        foreign.iss = "someone-else".to_string();
        let token = signer.sign(&foreign).unwrap();
        let err = signer.verify(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_expired_claims_still_verify() {
        let config = config("secret-one");
        let signer = JwtSigner::new(&config);
        let mut stale = claims(&config);
        stale.exp = stale.iat - 3600;
        let token = signer.sign(&stale).unwrap();
        assert_eq!(signer.verify(&token).unwrap().exp, stale.exp);
    }
}
