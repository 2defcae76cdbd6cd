mod helpers;
mod middleware;
mod password;
mod token;

pub use middleware::{AuthError, RequireAdmin, RequireAuth};
pub use password::{hash_password, verify_password};
pub use token::{TokenGenerator, parse_token};
