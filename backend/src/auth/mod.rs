//! Authentication module
//!
//! Bearer-token authentication: HS256 JWT access/refresh tokens and
//! argon2 password hashing.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenKind};
pub use middleware::{AuthUser, MaybeAuthUser};
pub use password::PasswordService;
