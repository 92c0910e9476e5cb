//! In-memory Entry Store - used when no database is configured, and in tests.

mod live_blog_store;

pub use live_blog_store::InMemoryLiveBlogStore;
