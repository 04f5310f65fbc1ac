//! Request extractors that turn rejections into `detail` error bodies

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use userhub_database::UserRole;
use userhub_users::{Claims, UserError};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::state::AppState;

/// JSON body whose parse failures are reported as 422.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::unprocessable(&["body"], rejection.body_text(), "json_invalid"))?;
        Ok(Self(value))
    }
}

/// JSON body that must also pass its `validator` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(value) = ApiJson::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| ApiError::validation("body", &errors))?;
        Ok(Self(value))
    }
}

/// Query string that must pass its `validator` rules.
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::unprocessable(&["query"], rejection.body_text(), "query_invalid"))?;
        value
            .validate()
            .map_err(|errors| ApiError::validation("query", &errors))?;
        Ok(Self(value))
    }
}

/// The `:user_id` path segment parsed as a UUID.
pub struct UserIdPath(pub Uuid);

pub fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        ApiError::unprocessable(
            &["path", "user_id"],
            format!("Input should be a valid UUID, {e}"),
            "uuid_parsing",
        )
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::unprocessable(&["path", "user_id"], rejection.body_text(), "missing"))?;
        parse_user_id(&raw).map(Self)
    }
}

/// Any caller holding a valid access token.
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.authenticate(&parts.headers).map(Self)
    }
}

/// A caller who currently holds the ADMIN or MANAGER role.
///
/// The role is read from the stored user, not from the token, so demoted or
/// deleted accounts lose access before their token expires.
pub struct StaffUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        let user_id = Uuid::parse_str(&claims.uid)
            .map_err(|_| ApiError::unauthorized("Could not validate credentials"))?;

        let user = match state.user_service().get_by_id(user_id).await {
            Ok(user) => user,
            Err(UserError::UserNotFound) => {
                return Err(ApiError::unauthorized("Could not validate credentials"))
            }
            Err(error) => return Err(error.into()),
        };

        match user.role {
            UserRole::Admin | UserRole::Manager => Ok(Self(claims)),
            _ => Err(ApiError::forbidden("Operation not permitted")),
        }
    }
}
