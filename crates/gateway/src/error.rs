//! Error types for the gateway layer
//!
//! Every error body has a single top-level `detail` key. Validation problems
//! carry a list of `{loc, msg, type}` entries, everything else a string.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;
use userhub_users::UserError;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(value_type = Object)]
    pub detail: Value,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: Value::String(detail.into()),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// 422 with a single `{loc, msg, type}` entry.
    pub fn unprocessable(loc: &[&str], msg: impl Into<String>, kind: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: json!([{ "loc": loc, "msg": msg.into(), "type": kind }]),
        }
    }

    /// 422 listing every failed rule, located under `location`.
    pub fn validation(location: &str, errors: &ValidationErrors) -> Self {
        let mut entries = Vec::new();
        collect_validation_entries(location, errors, &mut entries);
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: Value::Array(entries),
        }
    }
}

fn collect_validation_entries(location: &str, errors: &ValidationErrors, entries: &mut Vec<Value>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (field, kind) in fields {
        let ValidationErrorsKind::Field(field_errors) = kind else {
            continue;
        };
        let name: &str = field.as_ref();
        let loc: Vec<&str> = if name == "__all__" {
            vec![location]
        } else {
            vec![location, name]
        };
        for err in field_errors {
            let msg = err
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("Invalid value ({})", err.code));
            entries.push(json!({ "loc": loc, "msg": msg, "type": err.code }));
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (status, Json(ErrorResponse { detail: self.detail })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UserNotFound => ApiError::not_found("User not found"),
            UserError::EmailAlreadyExists => ApiError::bad_request("Email already exists"),
            UserError::NicknameAlreadyExists => ApiError::bad_request("Nickname already exists"),
            UserError::InvalidCredentials => ApiError::unauthorized(error.to_string()),
            UserError::AccountLocked | UserError::InvalidVerificationToken => {
                ApiError::bad_request(error.to_string())
            }
            UserError::Validation(errors) => ApiError::validation("body", &errors),
            UserError::PasswordHash(_) | UserError::Token(_) | UserError::Database(_) => {
                error!(error = ?error, "user service error");
                ApiError::internal_server_error()
            }
        }
    }
}

/// Result type for gateway handlers
pub type ApiResult<T> = Result<T, ApiError>;
