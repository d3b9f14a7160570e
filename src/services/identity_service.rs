//! Identity service - Issues and verifies signed identity tokens.
//!
//! Trust is purely cryptographic and time-bounded: verification never
//! touches the database, so a user banned after issuance keeps a valid
//! token until it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, TOKEN_TTL_HOURS};
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Identity service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait IdentityService: Send + Sync {
    /// Sign a claim set for `user`.
    fn issue(&self, user: &User) -> AppResult<IssuedToken>;

    /// Check signature and expiry, returning the trusted claims.
    fn verify(&self, token: &str) -> AppResult<Claims>;
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// HS256 implementation of IdentityService.
pub struct JwtIdentity {
    keys: Option<SigningKeys>,
    ttl: Duration,
}

impl JwtIdentity {
    /// Create an identity service with the standard 12 hour token lifetime.
    pub fn new(config: &Config) -> Self {
        Self::with_ttl(config, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(config: &Config, ttl: Duration) -> Self {
        let secret = config.jwt_secret();
        let keys = (!secret.is_empty()).then(|| SigningKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        Self { keys, ttl }
    }

    fn keys(&self) -> AppResult<&SigningKeys> {
        self.keys.as_ref().ok_or(AppError::ServerMisconfigured)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

impl IdentityService for JwtIdentity {
    fn issue(&self, user: &User) -> AppResult<IssuedToken> {
        let keys = self.keys()?;
        let now = Utc::now();

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl.num_seconds(),
        })
    }

    fn verify(&self, token: &str) -> AppResult<Claims> {
        let keys = self.keys()?;

        decode::<Claims>(token, &keys.decoding, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn test_user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hashed".to_string(),
            role,
            is_active: true,
            profile: Default::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify_carries_identity() {
        let identity = JwtIdentity::new(&Config::new("sqlite::memory:", SECRET));
        let user = test_user(UserRole::Admin);

        let issued = identity.issue(&user).unwrap();
        let claims = identity.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
        assert_eq!(issued.expires_in, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let issuer = JwtIdentity::new(&Config::new("sqlite::memory:", "another-secret-that-is-long-enough!!"));
        let verifier = JwtIdentity::new(&Config::new("sqlite::memory:", SECRET));

        let issued = issuer.issue(&test_user(UserRole::User)).unwrap();
        let err = verifier.verify(&issued.token).unwrap_err();

        assert!(matches!(err, AppError::InvalidToken));
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let config = Config::new("sqlite::memory:", SECRET);
        let identity = JwtIdentity::with_ttl(&config, Duration::seconds(-5));

        let issued = identity.issue(&test_user(UserRole::User)).unwrap();

        assert!(matches!(
            JwtIdentity::new(&config).verify(&issued.token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let identity = JwtIdentity::new(&Config::new("sqlite::memory:", SECRET));
        assert!(matches!(identity.verify("not.a.jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(identity.verify(""), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_missing_secret_is_misconfiguration() {
        let identity = JwtIdentity::new(&Config::new("sqlite::memory:", ""));

        assert!(matches!(
            identity.issue(&test_user(UserRole::User)),
            Err(AppError::ServerMisconfigured)
        ));
        assert!(matches!(
            identity.verify("anything"),
            Err(AppError::ServerMisconfigured)
        ));
    }
}
