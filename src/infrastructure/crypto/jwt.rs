//! JWT Token handling

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::clock::{system_clock, SharedClock};

/// Every token is valid for exactly this long after issuance.
pub const TOKEN_LIFETIME_HOURS: i64 = 2;

const DEFAULT_ISSUER: &str = "notes-service";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    secret: String,
    /// Issuer claim
    pub issuer: String,
}

impl JwtConfig {
    /// A blank secret is a configuration error, never a per-request one.
    pub fn new(secret: impl Into<String>) -> Result<Self, TokenError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            secret,
            issuer: DEFAULT_ISSUER.to_string(),
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// User id
    pub id: i32,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn new(user_id: i32, issued_at: DateTime<Utc>, issuer: &str) -> Self {
        let exp = issued_at + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            id: user_id,
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
            iss: issuer.to_string(),
        }
    }

    /// A token is dead from its `exp` second onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("JWT secret is not configured")]
    MissingSecret,
}

/// Issues and verifies HS256 bearer tokens.
///
/// Stateless apart from the secret and the clock, so one instance is shared
/// by every request.
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: SharedClock,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    pub fn with_clock(config: JwtConfig, clock: SharedClock) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a token for a user, valid from now for the fixed lifetime.
    pub fn issue(&self, user_id: i32) -> Result<String, TokenError> {
        let claims = TokenClaims::new(user_id, self.clock.now(), &self.config.issuer);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify a token against the service clock.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    /// Verify signature and structure, then check expiry against `now`.
    ///
    /// Expiry is checked here rather than by `jsonwebtoken` so the clock
    /// stays injectable and no leeway applies.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed(e),
                }
            })?;

        if token_data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::shared::clock::FixedClock;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret-with-enough-entropy").unwrap()
    }

    fn service_at(now: DateTime<Utc>) -> TokenService {
        TokenService::with_clock(config(), Arc::new(FixedClock(now)))
    }

    #[test]
    fn test_issue_and_verify_token() {
        let service = TokenService::new(config());
        let token = service.issue(42).unwrap();

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.exp - claims.iat, TOKEN_LIFETIME_HOURS * 3600);
        assert_eq!(claims.iss, "notes-service");
    }

    #[test]
    fn test_invalid_token() {
        let service = TokenService::new(config());
        assert!(matches!(
            service.verify("invalid-token"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn expires_exactly_at_two_hours() {
        let issued = Utc::now();
        let service = service_at(issued);
        let token = service.issue(7).unwrap();

        let just_before = issued + Duration::hours(2) - Duration::seconds(1);
        assert_eq!(service.verify_at(&token, just_before).unwrap().id, 7);

        let at_expiry = issued + Duration::hours(2);
        assert!(matches!(
            service.verify_at(&token, at_expiry),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            service.verify_at(&token, issued + Duration::days(1)),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn token_from_another_secret_is_malformed() {
        let other = TokenService::new(JwtConfig::new("some-other-secret").unwrap());
        let token = other.issue(1).unwrap();

        let service = TokenService::new(config());
        assert!(matches!(service.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn tampered_payload_is_malformed() {
        let service = TokenService::new(config());
        let token = service.issue(1).unwrap();
        let forged = service.issue(2).unwrap();

        // Header and signature from one token, payload from another.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(
            service.verify(&spliced),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let other = TokenService::new(config().with_issuer("someone-else"));
        let token = other.issue(1).unwrap();
        let service = TokenService::new(config());
        assert!(matches!(service.verify(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn blank_secret_is_a_config_error() {
        assert!(matches!(JwtConfig::new(""), Err(TokenError::MissingSecret)));
        assert!(matches!(JwtConfig::new("   "), Err(TokenError::MissingSecret)));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let printed = format!("{:?}", config());
        assert!(!printed.contains("test-secret"));
    }
}
