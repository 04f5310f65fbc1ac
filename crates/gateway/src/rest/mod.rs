//! REST API endpoints for the gateway

pub mod auth;
pub mod health;
pub mod users;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::create_auth_routes())
        .merge(users::create_user_routes())
}
