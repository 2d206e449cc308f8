//! Password hashing and session tokens.

mod jwt;
mod password;

pub use jwt::{DEV_SECRET, JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;
