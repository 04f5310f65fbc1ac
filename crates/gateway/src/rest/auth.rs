//! Registration, login and email verification endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use userhub_users::utils::user_links;
use userhub_users::{LoginRequest, TokenResponse, UserCreate, UserResponse};
use utoipa::ToSchema;

use crate::error::ApiResult;
use crate::extract::{parse_user_id, ApiJson, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/register/", post(register))
        .route("/login", post(login))
        .route("/login/", post(login))
        .route("/verify-email/:user_id/:token", get(verify_email))
}

#[utoipa::path(
    post,
    path = "/register/",
    tag = "Auth",
    request_body = UserCreate,
    responses(
        (status = 200, description = "User registered", body = UserResponse),
        (status = 400, description = "Email or nickname already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserCreate>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service().register(payload).await?;
    let links = user_links(state.public_base_url(), user.id);
    Ok(Json(UserResponse::from(user).with_links(links)))
}

#[utoipa::path(
    post,
    path = "/login/",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = TokenResponse),
        (status = 400, description = "Account locked", body = ErrorResponse),
        (status = 401, description = "Incorrect email or password", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .user_service()
        .login(&credentials.email, &credentials.password)
        .await?;
    let token = state.jwt().generate_token(&user)?;

    info!(user_id = %user.id, "issued access token");
    Ok(Json(TokenResponse::bearer(token)))
}

#[utoipa::path(
    get,
    path = "/verify-email/{user_id}/{token}",
    tag = "Auth",
    params(
        ("user_id" = String, Path, description = "User identifier"),
        ("token" = String, Path, description = "Verification token from the email")
    ),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or expired verification token", body = ErrorResponse)
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Path((user_id, token)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = parse_user_id(&user_id)?;
    state.user_service().verify_email(user_id, &token).await?;
    Ok(Json(MessageResponse {
        message: "Email verified successfully".to_string(),
    }))
}
