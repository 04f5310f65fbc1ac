//! Error types for the user management system.

use thiserror::Error;
use userhub_database::DatabaseError;

/// User-related errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Nickname already exists")]
    NicknameAlreadyExists,

    #[error("Incorrect email or password.")]
    InvalidCredentials,

    #[error("Account locked due to too many failed login attempts.")]
    AccountLocked,

    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

pub type UserResult<T> = Result<T, UserError>;
