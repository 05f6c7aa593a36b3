//! JWT encoding and decoding (HS256).

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{AppError, AppResult, TokenError};

/// Verified token contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// User id
    pub sub: i32,
    /// Absolute expiry, seconds since the epoch
    pub exp: i64,
}

/// Claims as signed. Registered `sub` is a string.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    exp: i64,
}

/// Signs and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret_bytes())
    }

    pub fn encode(&self, subject: i32, expires_at: DateTime<Utc>) -> AppResult<String> {
        let claims = WireClaims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Token encoding failed: {}", e)))
    }

    /// Verify signature and expiry.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = decode::<WireClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        let sub = claims.sub.parse().map_err(|_| TokenError::Malformed)?;
        Ok(TokenClaims {
            sub,
            exp: claims.exp,
        })
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"unit-test-secret-that-is-long-enough";

    #[test]
    fn test_encode_decode() {
        let jwt = JwtService::new(SECRET);
        let expires = Utc::now() + Duration::minutes(5);
        let token = jwt.encode(42, expires).unwrap();

        let claims = jwt.decode(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.exp, expires.timestamp());
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new(SECRET);
        let token = jwt.encode(1, Utc::now() - Duration::minutes(1)).unwrap();

        assert_eq!(jwt.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_signature() {
        let token = JwtService::new(SECRET)
            .encode(1, Utc::now() + Duration::minutes(5))
            .unwrap();
        let other = JwtService::new(b"another-secret-that-is-long-enough!!");

        assert_eq!(other.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_subject_is_signed_as_string() {
        let jwt = JwtService::new(SECRET);
        let token = jwt.encode(42, Utc::now() + Duration::minutes(5)).unwrap();

        let raw = decode::<serde_json::Value>(&token, &jwt.decoding, &jwt.validation).unwrap();
        assert_eq!(raw.claims["sub"], "42");
    }

    #[test]
    fn test_non_numeric_subject_is_malformed() {
        let jwt = JwtService::new(SECRET);
        let claims = WireClaims {
            sub: "alice".to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &jwt.encoding).unwrap();

        assert_eq!(jwt.decode(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_malformed_token() {
        let jwt = JwtService::new(SECRET);
        assert_eq!(jwt.decode("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(jwt.decode(""), Err(TokenError::Malformed));
    }
}
