//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM. Without it only
//!   the in-memory store is built.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryBlogStore};

#[cfg(feature = "postgres")]
pub use database::{DatabaseConnections, PostgresUnitOfWork};
