//! Internal utilities for the user management system.

pub mod jwt;
pub mod links;
pub mod nickname;
pub mod password;
pub mod validation;

pub use jwt::{Claims, JwtManager};
pub use links::{pagination_links, user_links};
pub use nickname::generate_nickname;
pub use password::{hash_password, verify_password};
pub use validation::*;
