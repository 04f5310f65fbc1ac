//! Request types for the user management system.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::utils::validation::{validate_http_url, validate_password_strength, NICKNAME_REGEX};
use userhub_database::UserRole;

/// Profile fields shared by every user shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserBase {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "john.doe@example.com")]
    pub email: String,

    #[validate(
        length(min = 3, message = "Nickname must be at least 3 characters long"),
        regex(
            path = *NICKNAME_REGEX,
            message = "Nickname may only contain letters, digits, underscores and hyphens"
        )
    )]
    #[schema(example = "john_doe_123")]
    pub nickname: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,

    #[schema(value_type = Option<String>, example = "AUTHENTICATED")]
    pub role: Option<UserRole>,

    #[validate(custom(function = "validate_http_url"))]
    pub profile_picture_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub linkedin_profile_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_profile_url: Option<String>,
}

/// Payload for creating or registering a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "john.doe@example.com")]
    pub email: String,

    #[validate(
        length(min = 3, message = "Nickname must be at least 3 characters long"),
        regex(
            path = *NICKNAME_REGEX,
            message = "Nickname may only contain letters, digits, underscores and hyphens"
        )
    )]
    #[schema(example = "john_doe_123")]
    pub nickname: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,

    #[schema(value_type = Option<String>, example = "AUTHENTICATED")]
    pub role: Option<UserRole>,

    #[validate(custom(function = "validate_http_url"))]
    pub profile_picture_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub linkedin_profile_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_profile_url: Option<String>,

    #[validate(
        length(
            min = 8,
            max = 128,
            message = "Password must be between 8 and 128 characters long"
        ),
        custom(function = "validate_password_strength")
    )]
    #[schema(example = "SecurePassword123!")]
    pub password: String,
}

impl UserCreate {
    /// Minimal payload with only the required fields set.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            nickname: None,
            first_name: None,
            last_name: None,
            bio: None,
            role: None,
            profile_picture_url: None,
            linkedin_profile_url: None,
            github_profile_url: None,
            password: password.into(),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

/// Partial update; at least one field must be present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_has_fields"))]
pub struct UserUpdate {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

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

    #[schema(value_type = Option<String>, example = "MANAGER")]
    pub role: Option<UserRole>,

    #[validate(custom(function = "validate_http_url"))]
    pub profile_picture_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub linkedin_profile_url: Option<String>,

    #[validate(custom(function = "validate_http_url"))]
    pub github_profile_url: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.nickname.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.bio.is_none()
            && self.role.is_none()
            && self.profile_picture_url.is_none()
            && self.linkedin_profile_url.is_none()
            && self.github_profile_url.is_none()
    }
}

fn validate_update_has_fields(update: &UserUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::new("empty_update")
            .with_message("At least one field must be provided for update".into()));
    }
    Ok(())
}

/// Credentials submitted to the login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "john.doe@example.com")]
    pub email: String,
    #[schema(example = "SecurePassword123!")]
    pub password: String,
}
