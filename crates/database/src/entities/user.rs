//! User entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// User entity as stored in the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    pub is_professional: bool,
    pub professional_status_updated_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub failed_login_attempts: i64,
    pub is_locked: bool,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh, unverified user with the given identity and password hash.
    pub fn new(email: String, nickname: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            nickname,
            email,
            first_name: None,
            last_name: None,
            bio: None,
            profile_picture_url: None,
            linkedin_profile_url: None,
            github_profile_url: None,
            role: UserRole::Anonymous,
            is_professional: false,
            professional_status_updated_at: None,
            last_login_at: None,
            failed_login_attempts: 0,
            is_locked: false,
            email_verified: false,
            verification_token: None,
            hashed_password,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn lock_account(&mut self) {
        self.is_locked = true;
    }

    pub fn unlock_account(&mut self) {
        self.is_locked = false;
        self.failed_login_attempts = 0;
    }

    /// Turn a pending user into the verified administrator of an empty instance.
    pub fn promote_to_first_admin(&mut self) {
        self.role = UserRole::Admin;
        self.verify_email();
    }

    pub fn verify_email(&mut self) {
        self.email_verified = true;
        self.verification_token = None;
    }

    pub fn update_professional_status(&mut self, status: bool) {
        self.is_professional = status;
        self.professional_status_updated_at = Some(Utc::now());
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Access level granted to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Anonymous,
    Authenticated,
    Manager,
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Anonymous,
        UserRole::Authenticated,
        UserRole::Manager,
        UserRole::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Anonymous => "ANONYMOUS",
            UserRole::Authenticated => "AUTHENTICATED",
            UserRole::Manager => "MANAGER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
