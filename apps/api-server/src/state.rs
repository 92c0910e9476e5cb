//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use newsdesk_core::LiveBlogService;
use newsdesk_infra::InMemoryLiveBlogStore;
use newsdesk_infra::database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
use newsdesk_infra::database::{PostgresLiveBlogRepository, PostgresTimelineRepository};

#[cfg(feature = "auth")]
use newsdesk_core::ports::TokenService;
#[cfg(feature = "auth")]
use newsdesk_infra::JwtTokenService;

#[cfg(feature = "rate-limit")]
use newsdesk_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use newsdesk_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub live_blogs: LiveBlogService,
    pub db: Option<Arc<DatabaseConnections>>,
    #[cfg(feature = "auth")]
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> io::Result<Self> {
        let (live_blogs, db) = connect_entry_store(config.database.as_ref()).await;
        let state = Self::assemble(live_blogs, db, config)?;

        tracing::info!(persistent = state.db.is_some(), "Application state initialized");
        Ok(state)
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(config: &AppConfig) -> io::Result<Self> {
        Self::assemble(in_memory_service(), None, config)
    }

    #[allow(unused_variables)]
    fn assemble(
        live_blogs: LiveBlogService,
        db: Option<Arc<DatabaseConnections>>,
        config: &AppConfig,
    ) -> io::Result<Self> {
        Ok(Self {
            live_blogs,
            db,
            #[cfg(feature = "auth")]
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            #[cfg(feature = "rate-limit")]
            rate_limiter: Arc::new(
                InMemoryRateLimiter::new(config.rate_limit.clone()).map_err(io::Error::other)?,
            ),
        })
    }
}

fn in_memory_service() -> LiveBlogService {
    let store = Arc::new(InMemoryLiveBlogStore::new());
    LiveBlogService::new(store.clone(), store)
}

#[cfg(feature = "postgres")]
async fn connect_entry_store(
    db_config: Option<&DatabaseConfig>,
) -> (LiveBlogService, Option<Arc<DatabaseConnections>>) {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return (in_memory_service(), None);
    };

    match DatabaseConnections::init(config).await {
        Ok(connections) => {
            let conn = Arc::new(connections);
            let blogs = Arc::new(PostgresLiveBlogRepository::new(conn.main.clone()));
            let entries = Arc::new(PostgresTimelineRepository::new(conn.main.clone()));
            (LiveBlogService::new(blogs, entries), Some(conn))
        }
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            (in_memory_service(), None)
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn connect_entry_store(
    _db_config: Option<&DatabaseConfig>,
) -> (LiveBlogService, Option<Arc<DatabaseConnections>>) {
    tracing::info!("Running without postgres feature - using in-memory store");
    (in_memory_service(), None)
}
