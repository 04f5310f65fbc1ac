//! JWT (JSON Web Token) utilities for authentication.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use userhub_config::AuthConfig;
use userhub_database::{User, UserRole};

use crate::types::{UserError, UserResult};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Email of the authenticated user
    pub sub: String,
    pub role: String,
    pub uid: String,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
}

impl Claims {
    pub fn role(&self) -> Option<UserRole> {
        self.role.parse().ok()
    }
}

/// JWT token manager
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_duration: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            token_duration: Duration::from_secs(30 * 60),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_issuer.clone())
            .with_duration(Duration::from_secs(config.access_token_ttl_minutes * 60))
    }

    /// Set custom token duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.token_duration = duration;
        self
    }

    /// Issue an access token for `user`
    pub fn generate_token(&self, user: &User) -> UserResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| UserError::Token(e.to_string()))?;

        let claims = Claims {
            sub: user.email.clone(),
            role: user.role.as_str().to_string(),
            uid: user.id.to_string(),
            iat: now.as_secs(),
            exp: (now + self.token_duration).as_secs(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| UserError::Token(e.to_string()))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> UserResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| UserError::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_jwt_manager() -> JwtManager {
        JwtManager::new("test_secret_key_that_is_long_enough_for_hs256", "test_issuer")
    }

    fn test_user() -> User {
        let mut user = User::new(
            "john.doe@example.com".to_string(),
            "john_doe".to_string(),
            "hash".to_string(),
        );
        user.role = UserRole::Manager;
        user
    }

    #[test]
    fn test_token_generation_and_validation() {
        let jwt_manager = create_test_jwt_manager();
        let user = test_user();

        let token = jwt_manager.generate_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = jwt_manager.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "john.doe@example.com");
        assert_eq!(claims.role(), Some(UserRole::Manager));
        assert_eq!(claims.uid, user.id.to_string());
        assert_eq!(claims.iss, "test_issuer");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_invalid_token() {
        let jwt_manager = create_test_jwt_manager();
        assert!(jwt_manager.validate_token("invalid.jwt.token").is_err());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = JwtManager::new("a_completely_different_secret_value", "test_issuer");
        let token = other.generate_token(&test_user()).unwrap();

        assert!(create_test_jwt_manager().validate_token(&token).is_err());
    }

    #[test]
    fn test_token_from_other_issuer_is_rejected() {
        let other = JwtManager::new("test_secret_key_that_is_long_enough_for_hs256", "someone_else");
        let token = other.generate_token(&test_user()).unwrap();

        assert!(create_test_jwt_manager().validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt_manager = create_test_jwt_manager();
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let claims = Claims {
            sub: "john.doe@example.com".to_string(),
            role: "ADMIN".to_string(),
            uid: "id".to_string(),
            iat: now - 7200,
            exp: now - 3600,
            iss: "test_issuer".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_that_is_long_enough_for_hs256"),
        )
        .unwrap();

        assert!(jwt_manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_from_config_uses_configured_ttl() {
        let config = AuthConfig {
            access_token_ttl_minutes: 5,
            ..AuthConfig::default()
        };
        let jwt_manager = JwtManager::from_config(&config);
        let token = jwt_manager.generate_token(&test_user()).unwrap();
        let claims = jwt_manager.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 5 * 60);
        assert_eq!(claims.iss, "userhub");
    }
}
