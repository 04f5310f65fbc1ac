//! Response types for the user management system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_http_url, NICKNAME_REGEX};
use userhub_database::{User, UserRole};

/// A HATEOAS link attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub rel: String,
    pub href: String,
    pub method: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: method.into(),
        }
    }
}

fn default_response_role() -> UserRole {
    UserRole::Authenticated
}

/// Public view of a user, without credentials or internal counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(
        length(min = 3, message = "Nickname must be at least 3 characters long"),
        regex(
            path = *NICKNAME_REGEX,
            message = "Nickname may only contain letters, digits, underscores and hyphens"
        )
    )]
    pub nickname: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,

    #[serde(default = "default_response_role")]
    #[schema(value_type = String, example = "AUTHENTICATED")]
    pub role: UserRole,

    #[validate(custom(function = "validate_http_url"))]
    pub profile_picture_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub linkedin_profile_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_profile_url: Option<String>,

    #[serde(default)]
    pub is_professional: bool,

    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub links: Vec<Link>,
}

impl UserResponse {
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            nickname: Some(user.nickname),
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
            profile_picture_url: user.profile_picture_url,
            linkedin_profile_url: user.linkedin_profile_url,
            github_profile_url: user.github_profile_url,
            is_professional: user.is_professional,
            last_login_at: user.last_login_at,
            created_at: Some(user.created_at),
            updated_at: Some(user.updated_at),
            links: Vec::new(),
        }
    }
}

/// One page of users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub items: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// Bearer token issued on successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "TokenResponse::default_token_type")]
    pub token_type: String,
}

impl TokenResponse {
    fn default_token_type() -> String {
        "bearer".to_string()
    }

    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: Self::default_token_type(),
        }
    }
}
