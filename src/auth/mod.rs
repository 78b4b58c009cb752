//! Authentication and Authorization module
//!
//! Bearer JWTs for every staff request, bcrypt for stored passwords.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{create_token, verify_token, AuthError, Claims, JwtConfig};
pub use middleware::{admin_middleware, auth_middleware, AuthState, AuthenticatedUser};
pub use password::{hash_password, verify_password};
