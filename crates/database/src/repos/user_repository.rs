//! User repository for database operations.

use crate::entities::{User, UserRole};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, nickname, email, first_name, last_name, bio, \
    profile_picture_url, linkedin_profile_url, github_profile_url, role, is_professional, \
    professional_status_updated_at, last_login_at, failed_login_attempts, is_locked, \
    email_verified, verification_token, hashed_password, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        self.find_one("id", id.to_string()).await
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        self.find_one("email", email.to_string()).await
    }

    /// Find user by nickname
    pub async fn find_by_nickname(&self, nickname: &str) -> DatabaseResult<Option<User>> {
        self.find_one("nickname", nickname.to_string()).await
    }

    async fn find_one(&self, column: &'static str, value: String) -> DatabaseResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user_row).transpose()
    }

    /// Count all users
    pub async fn count(&self) -> DatabaseResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// List users ordered by creation time
    pub async fn list(&self, skip: i64, limit: i64) -> DatabaseResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(map_user_row).collect()
    }

    /// Insert a new user row
    pub async fn insert(&self, user: &User) -> DatabaseResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, nickname, email, first_name, last_name, bio,
                profile_picture_url, linkedin_profile_url, github_profile_url, role,
                is_professional, professional_status_updated_at, last_login_at,
                failed_login_attempts, is_locked, email_verified, verification_token,
                hashed_password, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.bio)
        .bind(&user.profile_picture_url)
        .bind(&user.linkedin_profile_url)
        .bind(&user.github_profile_url)
        .bind(user.role.as_str())
        .bind(user.is_professional)
        .bind(user.professional_status_updated_at)
        .bind(user.last_login_at)
        .bind(user.failed_login_attempts)
        .bind(user.is_locked)
        .bind(user.email_verified)
        .bind(&user.verification_token)
        .bind(&user.hashed_password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user.clone())
    }

    /// Insert `user`, or its [`User::promote_to_first_admin`] form when the table is empty.
    ///
    /// The emptiness check and the insert are one statement, so concurrent
    /// callers cannot both become the first administrator.
    pub async fn insert_claiming_first_admin(&self, user: &User) -> DatabaseResult<User> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, nickname, email, first_name, last_name, bio,
                profile_picture_url, linkedin_profile_url, github_profile_url, role,
                is_professional, professional_status_updated_at, last_login_at,
                failed_login_attempts, is_locked, email_verified, verification_token,
                hashed_password, created_at, updated_at
            )
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?,
                CASE WHEN empty.yes THEN 'ADMIN' ELSE ? END,
                ?, ?, ?, ?, ?,
                CASE WHEN empty.yes THEN 1 ELSE ? END,
                CASE WHEN empty.yes THEN NULL ELSE ? END,
                ?, ?, ?
            FROM (SELECT NOT EXISTS (SELECT 1 FROM users) AS yes) AS empty
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.bio)
        .bind(&user.profile_picture_url)
        .bind(&user.linkedin_profile_url)
        .bind(&user.github_profile_url)
        .bind(user.role.as_str())
        .bind(user.is_professional)
        .bind(user.professional_status_updated_at)
        .bind(user.last_login_at)
        .bind(user.failed_login_attempts)
        .bind(user.is_locked)
        .bind(user.email_verified)
        .bind(&user.verification_token)
        .bind(&user.hashed_password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_by_id(user.id).await?.ok_or_else(|| {
            DatabaseError::QueryError(format!("inserted user {} could not be read back", user.id))
        })
    }

    /// Persist every mutable column of an existing user
    pub async fn update(&self, user: &User) -> DatabaseResult<Option<User>> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                nickname = ?, email = ?, first_name = ?, last_name = ?, bio = ?,
                profile_picture_url = ?, linkedin_profile_url = ?, github_profile_url = ?,
                role = ?, is_professional = ?, professional_status_updated_at = ?,
                last_login_at = ?, failed_login_attempts = ?, is_locked = ?,
                email_verified = ?, verification_token = ?, hashed_password = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.bio)
        .bind(&user.profile_picture_url)
        .bind(&user.linkedin_profile_url)
        .bind(&user.github_profile_url)
        .bind(user.role.as_str())
        .bind(user.is_professional)
        .bind(user.professional_status_updated_at)
        .bind(user.last_login_at)
        .bind(user.failed_login_attempts)
        .bind(user.is_locked)
        .bind(user.email_verified)
        .bind(&user.verification_token)
        .bind(&user.hashed_password)
        .bind(user.updated_at)
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(user.id).await
    }

    /// Delete a user. Returns false when no row matched.
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn map_user_row(row: &SqliteRow) -> DatabaseResult<User> {
    let id: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id).map_err(|e| DatabaseError::InvalidData {
        column: "id".to_string(),
        message: e.to_string(),
    })?;

    let role: String = row.try_get("role")?;
    let role = role
        .parse::<UserRole>()
        .map_err(|e| DatabaseError::InvalidData {
            column: "role".to_string(),
            message: e.to_string(),
        })?;

    Ok(User {
        id,
        nickname: row.try_get("nickname")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        bio: row.try_get("bio")?,
        profile_picture_url: row.try_get("profile_picture_url")?,
        linkedin_profile_url: row.try_get("linkedin_profile_url")?,
        github_profile_url: row.try_get("github_profile_url")?,
        role,
        is_professional: row.try_get("is_professional")?,
        professional_status_updated_at: row
            .try_get::<Option<DateTime<Utc>>, _>("professional_status_updated_at")?,
        last_login_at: row.try_get::<Option<DateTime<Utc>>, _>("last_login_at")?,
        failed_login_attempts: row.try_get("failed_login_attempts")?,
        is_locked: row.try_get("is_locked")?,
        email_verified: row.try_get("email_verified")?,
        verification_token: row.try_get("verification_token")?,
        hashed_password: row.try_get("hashed_password")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
