//! Shared application state for the gateway

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use userhub_users::{Claims, JwtManager, UserRepository, UserService};

use crate::error::ApiError;

/// Shared application state containing all services
#[derive(Clone)]
pub struct AppState {
    user_service: Arc<UserService<UserRepository>>,
    jwt: Arc<JwtManager>,
    public_base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService<UserRepository>>,
        jwt: JwtManager,
        public_base_url: impl Into<String>,
    ) -> Self {
        let public_base_url: String = public_base_url.into();
        Self {
            user_service,
            jwt: Arc::new(jwt),
            public_base_url: Arc::from(public_base_url.trim_end_matches('/')),
        }
    }

    pub fn user_service(&self) -> &UserService<UserRepository> {
        &self.user_service
    }

    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// Base URL used in HATEOAS links
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Decode the bearer token carried by `headers`
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, ApiError> {
        let token = require_bearer(headers)?;
        self.jwt
            .validate_token(&token)
            .map_err(|_| ApiError::unauthorized("Could not validate credentials"))
    }
}

pub fn require_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(ApiError::unauthorized("Not authenticated"));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(ApiError::unauthorized("Not authenticated"));
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use serde_json::json;

    #[test]
    fn require_bearer_extracts_token_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer TOKEN123"));

        let token = require_bearer(&headers).expect("token should be extracted");
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn require_bearer_rejects_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

        let error = require_bearer(&headers).expect_err("should reject missing token");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.detail, json!("Not authenticated"));
    }

    #[test]
    fn require_bearer_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert!(require_bearer(&headers).is_err());
        assert!(require_bearer(&HeaderMap::new()).is_err());
    }
}
