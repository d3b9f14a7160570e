//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_ALLOWED_ORIGINS, DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Redis URL for rate limiting; `None` disables rate limiting
    pub redis_url: Option<String>,
    jwt_secret: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub allowed_origins: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing or empty `JWT_SECRET` is not rejected here; call
    /// [`Config::validate`] before serving requests.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: non_empty_var("REDIS_URL"),
            jwt_secret: non_empty_var("JWT_SECRET"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
        }
    }

    /// Build a configuration with explicit values (tests and embedding).
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        let secret = jwt_secret.into();
        Self {
            database_url: database_url.into(),
            redis_url: None,
            jwt_secret: if secret.is_empty() { None } else { Some(secret) },
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }

    /// Check startup invariants. A missing signing secret is fatal.
    pub fn validate(&self) -> AppResult<()> {
        match &self.jwt_secret {
            None => {
                tracing::error!("JWT_SECRET is not set; refusing to start");
                Err(AppError::ServerMisconfigured)
            }
            Some(secret) => {
                if secret.len() < MIN_JWT_SECRET_LENGTH {
                    tracing::warn!(
                        "JWT_SECRET is shorter than {} characters; consider a longer secret",
                        MIN_JWT_SECRET_LENGTH
                    );
                }
                Ok(())
            }
        }
    }

    /// Get JWT secret for token signing/verification (empty if unset).
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or_default()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_fails_validation() {
        let config = Config::new("sqlite::memory:", "");
        assert!(matches!(config.validate(), Err(AppError::ServerMisconfigured)));
        assert_eq!(config.jwt_secret(), "");
    }

    #[test]
    fn test_present_secret_passes_validation() {
        let config = Config::new("sqlite::memory:", "a-secret-that-is-long-enough-for-hs256");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@db/app", "super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("pw@db"));
    }

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://a.test, http://b.test,,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
