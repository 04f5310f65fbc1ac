//! User management endpoints, restricted to ADMIN and MANAGER callers

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use userhub_users::utils::{pagination_links, user_links};
use userhub_users::{User, UserCreate, UserListResponse, UserResponse, UserUpdate};
use utoipa::IntoParams;
use validator::Validate;

use crate::error::ApiResult;
use crate::extract::{StaffUser, UserIdPath, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    #[serde(default)]
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: i64,
}

pub fn create_user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/:user_id",
            get(get_user)
                .put(update_user)
                .patch(patch_user)
                .delete(delete_user),
        )
}

fn to_response(state: &AppState, user: User) -> UserResponse {
    let links = user_links(state.public_base_url(), user.id);
    UserResponse::from(user).with_links(links)
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    params(ListUsersQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Page of users", body = UserListResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Operation not permitted", body = ErrorResponse)
    )
)]
pub async fn list_users(
    StaffUser(_caller): StaffUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> ApiResult<Json<UserListResponse>> {
    let service = state.user_service();
    let total = service.count().await?;
    let users = service.list(query.skip, query.limit).await?;

    let items: Vec<UserResponse> = users.into_iter().map(|user| to_response(&state, user)).collect();
    Ok(Json(UserListResponse {
        total,
        page: query.skip / query.limit + 1,
        size: items.len() as i64,
        links: pagination_links(state.public_base_url(), query.skip, query.limit, total),
        items,
    }))
}

#[utoipa::path(
    post,
    path = "/users/",
    tag = "Users",
    request_body = UserCreate,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Email or nickname already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_user(
    StaffUser(caller): StaffUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service().create(payload).await?;
    info!(created_by = %caller.sub, user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(to_response(&state, user))))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    StaffUser(_caller): StaffUser,
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service().get_by_id(user_id).await?;
    Ok(Json(to_response(&state, user)))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UserUpdate,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn update_user(
    StaffUser(_caller): StaffUser,
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
    ValidatedJson(payload): ValidatedJson<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service().update(user_id, payload).await?;
    Ok(Json(to_response(&state, user)))
}

#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UserUpdate,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn patch_user(
    caller: StaffUser,
    state: State<AppState>,
    user_id: UserIdPath,
    payload: ValidatedJson<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    update_user(caller, state, user_id, payload).await
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User identifier")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    StaffUser(caller): StaffUser,
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<StatusCode> {
    state.user_service().delete(user_id).await?;
    info!(deleted_by = %caller.sub, user_id = %user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
