//! Input validation utilities.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use once_cell::sync::Lazy;
use rand::RngCore;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

/// Letters, digits, underscores and hyphens.
pub static NICKNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+$").expect("nickname pattern is valid"));

/// `http` or `https` scheme followed by a non-empty host.
pub static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url pattern is valid")
});

pub const NICKNAME_MIN_LENGTH: usize = 3;
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const PASSWORD_MAX_LENGTH: usize = 128;

const VERIFICATION_TOKEN_BYTES: usize = 24;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Whether `nickname` satisfies the length and character rules.
pub fn is_valid_nickname(nickname: &str) -> bool {
    nickname.chars().count() >= NICKNAME_MIN_LENGTH && NICKNAME_REGEX.is_match(nickname)
}

/// Profile URLs must be absolute `http(s)` URLs.
pub fn validate_http_url(url: &str) -> Result<(), ValidationError> {
    if URL_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(error("url", "Invalid URL format"))
    }
}

/// Require at least one lowercase letter, one uppercase letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(error(
            "password_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(error(
            "password_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(error(
            "password_digit",
            "Password must contain at least one digit",
        ));
    }
    Ok(())
}

/// Random URL-safe token sent in verification links.
pub fn generate_verification_token() -> String {
    let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
