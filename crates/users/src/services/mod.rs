//! Business logic layer for user management

pub mod user_service;

#[cfg(test)]
pub(crate) mod mock_repositories;

pub use user_service::{UserRepo, UserService};
