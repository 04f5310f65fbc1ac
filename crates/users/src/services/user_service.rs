//! User service for managing user operations.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use userhub_database::{DatabaseError, DatabaseResult, SqlitePool, User, UserRepository, UserRole};
use userhub_email::EmailService;

use crate::types::{UserCreate, UserError, UserResult, UserUpdate};
use crate::utils::{
    generate_nickname, generate_verification_token, hash_password, validate_password_strength,
    verify_password, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
};

const NICKNAME_ATTEMPTS: usize = 32;

/// Storage operations the user service depends on
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;
    async fn find_by_nickname(&self, nickname: &str) -> DatabaseResult<Option<User>>;
    async fn count(&self) -> DatabaseResult<i64>;
    async fn list(&self, skip: i64, limit: i64) -> DatabaseResult<Vec<User>>;
    async fn insert(&self, user: &User) -> DatabaseResult<User>;
    /// Insert `user`, promoting it to the first administrator if no user exists yet.
    async fn insert_claiming_first_admin(&self, user: &User) -> DatabaseResult<User>;
    async fn update(&self, user: &User) -> DatabaseResult<Option<User>>;
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

#[async_trait]
impl UserRepo for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        UserRepository::find_by_id(self, id).await
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        UserRepository::find_by_email(self, email).await
    }

    async fn find_by_nickname(&self, nickname: &str) -> DatabaseResult<Option<User>> {
        UserRepository::find_by_nickname(self, nickname).await
    }

    async fn count(&self) -> DatabaseResult<i64> {
        UserRepository::count(self).await
    }

    async fn list(&self, skip: i64, limit: i64) -> DatabaseResult<Vec<User>> {
        UserRepository::list(self, skip, limit).await
    }

    async fn insert(&self, user: &User) -> DatabaseResult<User> {
        UserRepository::insert(self, user).await
    }

    async fn insert_claiming_first_admin(&self, user: &User) -> DatabaseResult<User> {
        UserRepository::insert_claiming_first_admin(self, user).await
    }

    async fn update(&self, user: &User) -> DatabaseResult<Option<User>> {
        UserRepository::update(self, user).await
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        UserRepository::delete(self, id).await
    }
}

/// Service for managing user operations
pub struct UserService<R> {
    user_repository: R,
    email_service: Arc<EmailService>,
    max_login_attempts: i64,
}

impl UserService<UserRepository> {
    /// Create a user service backed by the SQLite repository
    pub fn from_pool(pool: SqlitePool, email_service: Arc<EmailService>, max_login_attempts: u32) -> Self {
        Self::new(UserRepository::new(pool), email_service, max_login_attempts)
    }
}

impl<R> UserService<R>
where
    R: UserRepo,
{
    pub fn new(user_repository: R, email_service: Arc<EmailService>, max_login_attempts: u32) -> Self {
        Self {
            user_repository,
            email_service,
            max_login_attempts: i64::from(max_login_attempts.max(1)),
        }
    }

    pub fn repository(&self) -> &R {
        &self.user_repository
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, user_id: Uuid) -> UserResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    pub async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.user_repository.find_by_email(email).await?)
    }

    pub async fn get_by_nickname(&self, nickname: &str) -> UserResult<Option<User>> {
        Ok(self.user_repository.find_by_nickname(nickname).await?)
    }

    /// Create a user, honouring the requested role
    pub async fn create(&self, payload: UserCreate) -> UserResult<User> {
        self.create_user(payload, true).await
    }

    /// Self-service registration; any requested role is ignored
    pub async fn register(&self, payload: UserCreate) -> UserResult<User> {
        self.create_user(payload, false).await
    }

    async fn create_user(&self, payload: UserCreate, honour_role: bool) -> UserResult<User> {
        payload.validate()?;

        if self.user_repository.find_by_email(&payload.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let nickname = match payload.nickname {
            Some(nickname) => {
                if self.user_repository.find_by_nickname(&nickname).await?.is_some() {
                    return Err(UserError::NicknameAlreadyExists);
                }
                nickname
            }
            None => self.unique_nickname().await?,
        };

        let hashed_password = hash_password(&payload.password)?;
        let mut user = User::new(payload.email, nickname, hashed_password);
        user.first_name = payload.first_name;
        user.last_name = payload.last_name;
        user.bio = payload.bio;
        user.profile_picture_url = payload.profile_picture_url;
        user.linkedin_profile_url = payload.linkedin_profile_url;
        user.github_profile_url = payload.github_profile_url;

        let requested_role = payload.role.filter(|_| honour_role);
        let inserted = match requested_role {
            Some(role) => {
                user.role = role;
                if role == UserRole::Admin {
                    user.verify_email();
                } else {
                    user.verification_token = Some(generate_verification_token());
                }
                self.user_repository.insert(&user).await
            }
            None => {
                user.role = UserRole::Anonymous;
                user.verification_token = Some(generate_verification_token());
                self.user_repository.insert_claiming_first_admin(&user).await
            }
        };
        let user = inserted.map_err(map_duplicate)?;

        info!(user_id = %user.id, role = %user.role, "created user");

        if user.verification_token.is_some() {
            if let Err(err) = self.email_service.send_verification_email(&user).await {
                warn!(user_id = %user.id, error = %err, "failed to send verification email");
            }
        }

        Ok(user)
    }

    async fn unique_nickname(&self) -> UserResult<String> {
        for _ in 0..NICKNAME_ATTEMPTS {
            let candidate = generate_nickname();
            if self.user_repository.find_by_nickname(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!("{}_{}", generate_nickname(), &suffix[..8]))
    }

    /// Apply the fields present in `payload`
    pub async fn update(&self, user_id: Uuid, payload: UserUpdate) -> UserResult<User> {
        payload.validate()?;

        let mut user = self.get_by_id(user_id).await?;

        if let Some(email) = payload.email {
            if email != user.email {
                if self.user_repository.find_by_email(&email).await?.is_some() {
                    return Err(UserError::EmailAlreadyExists);
                }
                user.email = email;
            }
        }

        if let Some(nickname) = payload.nickname {
            if nickname != user.nickname {
                if self.user_repository.find_by_nickname(&nickname).await?.is_some() {
                    return Err(UserError::NicknameAlreadyExists);
                }
                user.nickname = nickname;
            }
        }

        if let Some(first_name) = payload.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = payload.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(bio) = payload.bio {
            user.bio = Some(bio);
        }
        if let Some(role) = payload.role {
            user.role = role;
        }
        if let Some(url) = payload.profile_picture_url {
            user.profile_picture_url = Some(url);
        }
        if let Some(url) = payload.linkedin_profile_url {
            user.linkedin_profile_url = Some(url);
        }
        if let Some(url) = payload.github_profile_url {
            user.github_profile_url = Some(url);
        }

        let user = self.save(user).await?;
        info!(user_id = %user.id, "updated user");
        Ok(user)
    }

    pub async fn delete(&self, user_id: Uuid) -> UserResult<()> {
        if !self.user_repository.delete(user_id).await? {
            return Err(UserError::UserNotFound);
        }
        info!(%user_id, "deleted user");
        Ok(())
    }

    pub async fn list(&self, skip: i64, limit: i64) -> UserResult<Vec<User>> {
        Ok(self.user_repository.list(skip, limit).await?)
    }

    pub async fn count(&self) -> UserResult<i64> {
        Ok(self.user_repository.count().await?)
    }

    /// Authenticate by email and password
    pub async fn login(&self, email: &str, password: &str) -> UserResult<User> {
        let mut user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if user.is_locked {
            return Err(UserError::AccountLocked);
        }

        if !user.email_verified {
            return Err(UserError::InvalidCredentials);
        }

        if verify_password(password, &user.hashed_password)? {
            user.failed_login_attempts = 0;
            user.last_login_at = Some(Utc::now());
            let user = self.save(user).await?;
            info!(user_id = %user.id, "user logged in");
            return Ok(user);
        }

        user.failed_login_attempts += 1;
        let locked_now = user.failed_login_attempts >= self.max_login_attempts;
        if locked_now {
            user.lock_account();
        }
        let user = self.save(user).await?;

        if locked_now {
            warn!(user_id = %user.id, "account locked after repeated failed logins");
            if let Err(err) = self.email_service.send_account_locked_email(&user).await {
                warn!(user_id = %user.id, error = %err, "failed to send account locked email");
            }
        }

        Err(UserError::InvalidCredentials)
    }

    pub async fn is_account_locked(&self, email: &str) -> UserResult<bool> {
        Ok(self
            .user_repository
            .find_by_email(email)
            .await?
            .map(|user| user.is_locked)
            .unwrap_or(false))
    }

    pub async fn unlock(&self, user_id: Uuid) -> UserResult<User> {
        let mut user = self.get_by_id(user_id).await?;
        user.unlock_account();
        self.save(user).await
    }

    pub async fn reset_password(&self, user_id: Uuid, new_password: &str) -> UserResult<User> {
        validate_new_password(new_password)?;

        let mut user = self.get_by_id(user_id).await?;
        user.hashed_password = hash_password(new_password)?;
        user.unlock_account();
        self.save(user).await
    }

    /// Confirm an email address with the token sent at registration
    pub async fn verify_email(&self, user_id: Uuid, token: &str) -> UserResult<User> {
        let mut user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserError::InvalidVerificationToken)?;

        if user.verification_token.as_deref() != Some(token) {
            return Err(UserError::InvalidVerificationToken);
        }

        user.verify_email();
        if user.role == UserRole::Anonymous {
            user.role = UserRole::Authenticated;
        }

        let user = self.save(user).await?;
        info!(user_id = %user.id, "email verified");
        Ok(user)
    }

    async fn save(&self, mut user: User) -> UserResult<User> {
        user.touch();
        self.user_repository
            .update(&user)
            .await
            .map_err(map_duplicate)?
            .ok_or(UserError::UserNotFound)
    }
}

fn map_duplicate(err: DatabaseError) -> UserError {
    match err {
        DatabaseError::Duplicate(column) if column == "email" => UserError::EmailAlreadyExists,
        DatabaseError::Duplicate(column) if column == "nickname" => UserError::NicknameAlreadyExists,
        other => UserError::Database(other),
    }
}

fn validate_new_password(password: &str) -> UserResult<()> {
    let length = password.chars().count();
    let result = if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        Err(ValidationError::new("length")
            .with_message("Password must be between 8 and 128 characters long".into()))
    } else {
        validate_password_strength(password)
    };

    result.map_err(|err| {
        let mut errors = ValidationErrors::new();
        errors.add("password", err);
        UserError::Validation(errors)
    })
}
