use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{LiveBlog, LiveBlogPatch, NewTimelineEntry, TimelineEntry};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity. Fails with `RepoError::Constraint` on a
    /// uniqueness violation.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Live blog metadata. Deleting a blog cascades to its entries.
#[async_trait]
pub trait LiveBlogRepository: BaseRepository<LiveBlog, Uuid> {
    /// Find a live blog by its URL slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<LiveBlog>, RepoError>;

    /// All live blogs, live ones first, then by most recent update.
    async fn list(&self) -> Result<Vec<LiveBlog>, RepoError>;

    /// Apply an editorial patch atomically against the stored row.
    ///
    /// A patch that would reopen an ended blog fails with
    /// `RepoError::Constraint`, even if the blog ended concurrently.
    async fn update(
        &self,
        id: Uuid,
        patch: LiveBlogPatch,
        now: DateTime<Utc>,
    ) -> Result<LiveBlog, RepoError>;

    /// Bump `updated_at` to `at` unless it is already newer.
    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError>;
}

/// Timeline entries of a live blog - the write and incremental read path.
#[async_trait]
pub trait TimelineRepository: Send + Sync {
    /// Entries with `created_at` strictly greater than `since` (all entries if
    /// `None`), newest first, ties broken by id descending.
    async fn entries_since(
        &self,
        blog_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<TimelineEntry>, RepoError>;

    /// Ids of the currently pinned entries of a blog.
    async fn pinned_ids(&self, blog_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// Append an entry. The store assigns id and a timestamp strictly newer
    /// than any existing entry of the blog, atomically per blog.
    async fn append(
        &self,
        blog_id: Uuid,
        draft: NewTimelineEntry,
        now: DateTime<Utc>,
    ) -> Result<TimelineEntry, RepoError>;

    /// Set the pin flag of one entry. Returns `RepoError::NotFound` if the
    /// entry does not belong to the blog.
    async fn set_pinned(
        &self,
        blog_id: Uuid,
        entry_id: Uuid,
        pinned: bool,
    ) -> Result<TimelineEntry, RepoError>;

    /// Hard-delete one entry.
    async fn delete_entry(&self, blog_id: Uuid, entry_id: Uuid) -> Result<(), RepoError>;
}
