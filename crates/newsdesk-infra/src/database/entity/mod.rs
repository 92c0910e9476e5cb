//! SeaORM entities.

pub mod live_blog;
pub mod timeline_entry;
