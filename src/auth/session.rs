//! Session token issuance and validation.
//!
//! Sessions are stateless: the server keeps no session table. Possession of
//! a validly signed, unexpired token is the proof of identity, re-derived on
//! every request. Claims are a snapshot taken at issuance; a role or profile
//! change only becomes visible after the next sign-in reissues the token.

use crate::{config::AppConfig, error::AppError, models::user::User};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Identity claims embedded in a session token.
///
/// Field names are part of the wire format and must not change: existing
/// clients carry tokens with exactly these names.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// User id
    #[serde(rename = "_id")]
    pub id: String,

    pub email: String,

    #[serde(rename = "profileImageURL")]
    pub profile_image_url: String,

    /// Role at issuance time
    pub role: String,

    /// Issued at (Unix seconds)
    pub iat: i64,

    /// Absolute expiry (Unix seconds)
    pub exp: i64,
}

/// Signs and validates session tokens with the process-wide secret key.
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl SessionService {
    /// Create the service from config.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.session_secret.expose_secret();

        // HS256 wants at least 32 bytes of key material
        if secret.len() < 32 {
            return Err(AppError::Config(
                "Session secret too short (min 32 chars)".to_string(),
            ));
        }

        // The embedded exp is authoritative to the second; no clock leeway
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: config.security.session_ttl_secs,
        })
    }

    /// Issue a signed token for a user, expiring `ttl_secs` from now.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now().timestamp();

        let claims = SessionClaims {
            id: user.id.to_string(),
            email: user.email.clone(),
            profile_image_url: user.profile_image_url.clone(),
            role: user.role.clone(),
            iat: now,
            exp: now + self.ttl_secs as i64,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate a token and return its claims.
    ///
    /// Every failure path (malformed structure, bad signature, expiry)
    /// normalizes to `None`. Validation failure is an expected outcome, not
    /// an error: downstream code must not be able to distinguish a forged
    /// cookie from no cookie at all.
    pub fn validate(&self, token: &str) -> Option<SessionClaims> {
        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Session token rejected: {:?}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::DEFAULT_PROFILE_IMAGE_URL;
    use secrecy::Secret;
    use uuid::Uuid;

    const TEST_SECRET: &str = "test_secret_key_32_characters_long!";

    fn test_config() -> AppConfig {
        AppConfig {
            server: crate::config::ServerConfig {
                addr: "127.0.0.1:8000".to_string(),
                graceful_shutdown_timeout_secs: 30,
            },
            database: crate::config::DatabaseConfig {
                url: Secret::new("postgresql://localhost/test".to_string()),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                idle_timeout_secs: 600,
                max_lifetime_secs: 1800,
            },
            logging: crate::config::LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
            security: crate::config::SecurityConfig {
                session_secret: Secret::new(TEST_SECRET.to_string()),
                session_ttl_secs: 3600,
                session_cookie_name: "token".to_string(),
                password_min_length: 8,
            },
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "irrelevant".to_string(),
            salt: "irrelevant".to_string(),
            profile_image_url: DEFAULT_PROFILE_IMAGE_URL.to_string(),
            role: "USER".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let service = SessionService::from_config(&test_config()).unwrap();
        let user = test_user();

        let token = service.issue(&user).unwrap();
        let claims = service.validate(&token).expect("fresh token should validate");

        assert_eq!(claims.id, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, "USER");
        assert_eq!(claims.profile_image_url, DEFAULT_PROFILE_IMAGE_URL);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_malformed_token_returns_none() {
        let service = SessionService::from_config(&test_config()).unwrap();

        assert!(service.validate("").is_none());
        assert!(service.validate("garbage").is_none());
        assert!(service.validate("a.b.c").is_none());
    }

    #[test]
    fn test_tampered_payload_fails_validation() {
        let service = SessionService::from_config(&test_config()).unwrap();
        let token = service.issue(&test_user()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // flip one character in the payload segment
        let mut payload = parts[1].to_string();
        let original = payload.as_bytes()[10] as char;
        let replacement = if original == 'A' { "B" } else { "A" };
        payload.replace_range(10..11, replacement);
        let forged = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert_ne!(forged, token);
        assert!(service.validate(&forged).is_none());
    }

    #[test]
    fn test_wrong_key_fails_validation() {
        let service = SessionService::from_config(&test_config()).unwrap();

        let mut other_config = test_config();
        other_config.security.session_secret =
            Secret::new("another_secret_key_32_characters_xx!".to_string());
        let other_service = SessionService::from_config(&other_config).unwrap();

        let token = other_service.issue(&test_user()).unwrap();
        assert!(service.validate(&token).is_none());
    }

    #[test]
    fn test_expired_token_fails_validation() {
        let service = SessionService::from_config(&test_config()).unwrap();
        let user = test_user();

        // correctly signed, but expired an hour ago
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            id: user.id.to_string(),
            email: user.email.clone(),
            profile_image_url: user.profile_image_url.clone(),
            role: user.role.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_none());
    }

    #[test]
    fn test_token_just_past_expiry_fails_validation() {
        let service = SessionService::from_config(&test_config()).unwrap();
        let user = test_user();

        // expired well under a minute ago; expiry is exact, with no
        // clock-skew allowance
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            id: user.id.to_string(),
            email: user.email.clone(),
            profile_image_url: user.profile_image_url.clone(),
            role: user.role.clone(),
            iat: now - 3630,
            exp: now - 30,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service.validate(&token).is_none());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = test_config();
        config.security.session_secret = Secret::new("short".to_string());

        assert!(SessionService::from_config(&config).is_err());
    }
}
