//! Token service for issuing and validating bearer credentials
//!
//! Tokens are HS256 JWTs signed with a single shared secret. The principal
//! kind travels inside the signed claims, so a property-owner token can never
//! pass a user check even though both kinds share the same claim layout.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::models::PrincipalKind;

/// Default token lifetime: 30 days
pub const DEFAULT_TOKEN_EXPIRY: u64 = 60 * 60 * 24 * 30;

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Token lifetime in seconds
    pub expiry: u64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiry: DEFAULT_TOKEN_EXPIRY,
        }
    }

    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SECRET_KEY`: HMAC signing secret (an unset variable is read as empty)
    /// - `TOKEN_EXPIRY_SECONDS`: Token lifetime in seconds (default: 2592000)
    pub fn from_env() -> Self {
        let secret = std::env::var("SECRET_KEY").unwrap_or_default();

        let expiry = std::env::var("TOKEN_EXPIRY_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        Self { secret, expiry }
    }

    /// An empty secret still signs, but anyone can forge the result
    pub fn is_insecure(&self) -> bool {
        self.secret.is_empty()
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal ID
    pub sub: Uuid,
    /// Which table the principal lives in
    pub kind: PrincipalKind,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Token failures
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signing failed
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Malformed, badly signed, wrongly algorithmed or expired token
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signature checks out but the token belongs to another principal kind
    #[error("token issued for {found}, expected {expected}")]
    KindMismatch {
        expected: PrincipalKind,
        found: PrincipalKind,
    },

    #[error("system clock is before the unix epoch")]
    Clock,
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            expiry: config.expiry,
        }
    }

    /// Issue a token for a principal
    pub fn issue(&self, principal_id: Uuid, kind: PrincipalKind) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TokenError::Clock)?
            .as_secs();

        let claims = Claims {
            sub: principal_id,
            kind,
            iat: now,
            exp: now + self.expiry,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    /// Validate a token and return its claims, whatever their kind
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;
        Ok(token_data.claims)
    }

    /// Validate a token for the expected principal kind and return the principal ID
    pub fn validate(&self, token: &str, expected: PrincipalKind) -> Result<Uuid, TokenError> {
        let claims = self.decode_claims(token)?;
        if claims.kind != expected {
            return Err(TokenError::KindMismatch {
                expected,
                found: claims.kind,
            });
        }
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tokio_test::{assert_err, assert_ok};

    // base64url of {"alg":"RS256","typ":"JWT"}
    const RS256_HEADER: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

    fn service(secret: &str) -> TokenService {
        TokenService::new(TokenConfig::new(secret))
    }

    #[test]
    fn test_round_trip_for_both_kinds() {
        let tokens = service("test-secret");

        for kind in [PrincipalKind::User, PrincipalKind::PropertyOwner] {
            let id = Uuid::new_v4();
            let token = assert_ok!(tokens.issue(id, kind));
            assert_eq!(assert_ok!(tokens.validate(&token, kind)), id);
        }
    }

    #[test]
    fn test_claims_carry_thirty_day_expiry() {
        let tokens = service("test-secret");
        let token = tokens.issue(Uuid::new_v4(), PrincipalKind::User).unwrap();

        let claims = tokens.decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 2_592_000);
        assert_eq!(claims.kind, PrincipalKind::User);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let issuer = service("first-secret");
        let verifier = service("second-secret");
        let token = issuer.issue(Uuid::new_v4(), PrincipalKind::User).unwrap();

        let err = assert_err!(verifier.validate(&token, PrincipalKind::User));
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_rejects_asymmetric_algorithm_header() {
        let tokens = service("test-secret");
        let token = tokens.issue(Uuid::new_v4(), PrincipalKind::User).unwrap();

        let mut parts = token.splitn(2, '.');
        let _header = parts.next().unwrap();
        let rest = parts.next().unwrap();
        let forged = format!("{RS256_HEADER}.{rest}");

        let err = assert_err!(tokens.validate(&forged, PrincipalKind::User));
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_rejects_kind_confusion() {
        let tokens = service("test-secret");
        let owner_token = tokens
            .issue(Uuid::new_v4(), PrincipalKind::PropertyOwner)
            .unwrap();

        let err = assert_err!(tokens.validate(&owner_token, PrincipalKind::User));
        assert!(matches!(
            err,
            TokenError::KindMismatch {
                expected: PrincipalKind::User,
                found: PrincipalKind::PropertyOwner,
            }
        ));
    }

    #[test]
    fn test_rejects_expired_token() {
        let tokens = service("test-secret");
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: Uuid::new_v4(),
            kind: PrincipalKind::User,
            iat: now - 100,
            exp: now - 1,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &tokens.encoding_key).unwrap();

        let err = assert_err!(tokens.validate(&token, PrincipalKind::User));
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_and_garbage_tokens() {
        let tokens = service("test-secret");

        assert_err!(tokens.validate("", PrincipalKind::User));
        assert_err!(tokens.validate("not-a-jwt", PrincipalKind::User));
        assert_err!(tokens.validate("a.b.c", PrincipalKind::PropertyOwner));
    }

    #[test]
    fn test_empty_secret_still_signs() {
        let config = TokenConfig::new("");
        assert!(config.is_insecure());

        let tokens = TokenService::new(config);
        let id = Uuid::new_v4();
        let token = tokens.issue(id, PrincipalKind::User).unwrap();
        assert_eq!(tokens.validate(&token, PrincipalKind::User).unwrap(), id);
    }

    #[test]
    #[serial]
    fn test_token_config_from_env() {
        unsafe {
            std::env::set_var("SECRET_KEY", "from-env");
            std::env::set_var("TOKEN_EXPIRY_SECONDS", "60");
        }

        let config = TokenConfig::from_env();
        assert_eq!(config.secret, "from-env");
        assert_eq!(config.expiry, 60);

        unsafe {
            std::env::remove_var("SECRET_KEY");
            std::env::remove_var("TOKEN_EXPIRY_SECONDS");
        }

        let config = TokenConfig::from_env();
        assert!(config.is_insecure());
        assert_eq!(config.expiry, DEFAULT_TOKEN_EXPIRY);
    }
}
