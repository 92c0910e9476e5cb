//! # Newsdesk Infrastructure
//!
//! Concrete implementations of the ports defined in `newsdesk-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory store only
//! - `postgres` - PostgreSQL Entry Store via SeaORM
//! - `auth` - JWT validation for the editorial endpoints
//! - `rate-limit` - Per-client poll rate limiting via governor

pub mod database;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports
pub use database::DatabaseConnections;
pub use memory::InMemoryLiveBlogStore;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
