//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod rate_limit;
mod repository;

pub use auth::{AuthError, EDITORIAL_ROLES, TokenClaims, TokenService};
pub use clock::{Clock, SystemClock};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, LiveBlogRepository, TimelineRepository};
