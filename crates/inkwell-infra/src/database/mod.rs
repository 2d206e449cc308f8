//! Database connection management and PostgreSQL adapters.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;
#[cfg(feature = "postgres")]
mod unit_of_work;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryBlogStore, InMemoryPublishingTx};

#[cfg(feature = "postgres")]
pub use connections::DatabaseConnections;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};
#[cfg(feature = "postgres")]
pub use unit_of_work::{PostgresPublishingTx, PostgresUnitOfWork};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
