//! PostgreSQL Entry Store.

mod connections;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresLiveBlogRepository, PostgresTimelineRepository};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
