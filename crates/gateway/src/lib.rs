//! # UserHub Gateway Crate
//!
//! HTTP surface of UserHub. Routes requests to the [`userhub_users::UserService`],
//! guards management endpoints with bearer tokens and renders every failure
//! as a `{"detail": ...}` body.
//!
//! ## Architecture
//!
//! - **REST**: health, auth and user management endpoints with OpenAPI documentation
//! - **Extract**: validated JSON/query extractors and the bearer-token role guard
//! - **State**: shared services handed to every handler
//! - **Middleware**: CORS, request logging and tracing spans
//!
//! ## Usage
//!
//! ```rust,ignore
//! use userhub_gateway::{create_router, AppState};
//!
//! let state = AppState::new(user_service, jwt, "http://localhost:7070");
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:7070").await?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod docs;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod rest;
pub mod state;

pub use docs::ApiDoc;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

use axum::{middleware as axum_middleware, routing::get, Json, Router};
use utoipa::OpenApi;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(rest::create_rest_routes())
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(middleware::create_cors_middleware())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::create_trace_middleware())
}
