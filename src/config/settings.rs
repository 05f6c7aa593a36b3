//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_MINUTES, DEFAULT_BACKEND_URL, DEFAULT_DATABASE_URL,
    DEFAULT_FRONTEND_URL, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MEDIA_DIR,
    DEFAULT_REFRESH_TOKEN_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub media_dir: PathBuf,
    pub backend_url: String,
    pub frontend_url: String,
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("media_dir", &self.media_dir)
            .field("backend_url", &self.backend_url)
            .field("frontend_url", &self.frontend_url)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the
    /// database URL and signing secret.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            media_dir: PathBuf::from(DEFAULT_MEDIA_DIR),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret);
        config.access_token_minutes = parse_var("ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or(DEFAULT_ACCESS_TOKEN_MINUTES);
        config.refresh_token_days =
            parse_var("REFRESH_TOKEN_EXPIRE_DAYS").unwrap_or(DEFAULT_REFRESH_TOKEN_DAYS);
        config.server_host =
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        config.server_port = parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT);
        if let Ok(dir) = env::var("MEDIA_DIR") {
            config.media_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("BACKEND_URL") {
            config.backend_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = env::var("FRONTEND_URL") {
            config.frontend_url = url;
        }
        config.max_upload_bytes = parse_var("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        config
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("sqlite::memory:", "a-secret-that-is-long-enough-for-jwt!");

        assert_eq!(config.access_token_minutes, 30);
        assert_eq!(config.refresh_token_days, 7);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@db/app", "a-secret-that-is-long-enough-for-jwt!");
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("pw@db"));
        assert!(!rendered.contains("a-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
