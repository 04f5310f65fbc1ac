use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::rest::health::health_check,
        crate::rest::auth::register,
        crate::rest::auth::login,
        crate::rest::auth::verify_email,
        crate::rest::users::list_users,
        crate::rest::users::create_user,
        crate::rest::users::get_user,
        crate::rest::users::update_user,
        crate::rest::users::patch_user,
        crate::rest::users::delete_user
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::rest::health::HealthResponse,
            crate::rest::auth::MessageResponse,
            userhub_users::Link,
            userhub_users::UserCreate,
            userhub_users::UserUpdate,
            userhub_users::LoginRequest,
            userhub_users::UserResponse,
            userhub_users::UserListResponse,
            userhub_users::TokenResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Registration, login and email verification"),
        (name = "Users", description = "User management for administrators and managers")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
