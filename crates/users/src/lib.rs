//! # UserHub Users Crate
//!
//! User management for UserHub: validated request and response schemas,
//! password hashing, access tokens, HATEOAS links and the [`UserService`]
//! that ties storage and email delivery together.
//!
//! ## Architecture
//!
//! - **Types**: request/response schemas and [`UserError`]
//! - **Services**: business logic over a [`UserRepo`]
//! - **Utils**: passwords, JWTs, nicknames, links and validation helpers

pub mod services;
pub mod types;
pub mod utils;

pub use userhub_database::{SqlitePool, User, UserRepository, UserRole};

pub use services::{UserRepo, UserService};
pub use types::{
    Link, LoginRequest, TokenResponse, UserBase, UserCreate, UserError, UserListResponse,
    UserResponse, UserResult, UserUpdate,
};
pub use utils::{Claims, JwtManager};
