//! Request, response and error types for the user management system.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{UserError, UserResult};
pub use requests::{LoginRequest, UserBase, UserCreate, UserUpdate};
pub use responses::{Link, TokenResponse, UserListResponse, UserResponse};
