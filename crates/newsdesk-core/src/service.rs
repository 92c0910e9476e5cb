//! Live blog service - the Entry Store contract shared by the public poll
//! path and the editorial write path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{LiveBlog, LiveBlogPatch, NewTimelineEntry, TimelineEntry};
use crate::error::{DomainError, RepoError};
use crate::ports::{Clock, LiveBlogRepository, SystemClock, TimelineRepository};

/// A live blog with its complete timeline, newest first.
#[derive(Debug, Clone)]
pub struct LiveBlogView {
    pub blog: LiveBlog,
    pub entries: Vec<TimelineEntry>,
}

/// Result of an incremental fetch.
#[derive(Debug, Clone)]
pub struct EntryPoll {
    /// Entries newer than the cursor, newest first.
    pub entries: Vec<TimelineEntry>,
    pub is_live: bool,
    /// Set once coverage has ended and a recap was written.
    pub summary: Option<String>,
    /// Every currently pinned entry, so clients can reconcile pin state of
    /// entries they already hold.
    pub pinned_ids: Vec<Uuid>,
}

/// Orchestrates the live blog repositories.
#[derive(Clone)]
pub struct LiveBlogService {
    blogs: Arc<dyn LiveBlogRepository>,
    entries: Arc<dyn TimelineRepository>,
    clock: Arc<dyn Clock>,
}

impl LiveBlogService {
    pub fn new(blogs: Arc<dyn LiveBlogRepository>, entries: Arc<dyn TimelineRepository>) -> Self {
        Self::with_clock(blogs, entries, Arc::new(SystemClock))
    }

    pub fn with_clock(
        blogs: Arc<dyn LiveBlogRepository>,
        entries: Arc<dyn TimelineRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            blogs,
            entries,
            clock,
        }
    }

    /// All live blogs, live first.
    pub async fn list(&self) -> Result<Vec<LiveBlog>, DomainError> {
        Ok(self.blogs.list().await?)
    }

    /// Full load by slug, used once per blog view.
    pub async fn load_by_slug(&self, slug: &str) -> Result<LiveBlogView, DomainError> {
        let blog = self
            .blogs
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::SlugNotFound(slug.to_string()))?;
        let entries = self.entries.entries_since(blog.id, None).await?;

        Ok(LiveBlogView { blog, entries })
    }

    /// Incremental fetch: entries strictly newer than `since`.
    pub async fn poll_entries(
        &self,
        blog_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<EntryPoll, DomainError> {
        // Blog state is read before the entries: anything appended before
        // coverage ended is then part of the same response.
        let blog = self.require_blog(blog_id).await?;
        let entries = self.entries.entries_since(blog_id, since).await?;
        let pinned_ids = self.entries.pinned_ids(blog_id).await?;

        tracing::debug!(
            blog_id = %blog_id,
            since = ?since,
            new_entries = entries.len(),
            is_live = blog.is_live,
            "Polled live blog"
        );

        Ok(EntryPoll {
            entries,
            is_live: blog.is_live,
            summary: blog.recap().map(str::to_string),
            pinned_ids,
        })
    }

    pub async fn create_blog(
        &self,
        slug: String,
        title: String,
        excerpt: Option<String>,
    ) -> Result<LiveBlog, DomainError> {
        let blog = LiveBlog::new(slug, title, excerpt, self.clock.now())?;

        if self.blogs.find_by_slug(&blog.slug).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Slug '{}' is already taken",
                blog.slug
            )));
        }

        let saved = self.blogs.create(blog).await?;
        tracing::info!(blog_id = %saved.id, slug = %saved.slug, "Live blog created");
        Ok(saved)
    }

    /// Update metadata and the live flag. Ending coverage is one-way.
    pub async fn update_blog(
        &self,
        blog_id: Uuid,
        patch: LiveBlogPatch,
    ) -> Result<LiveBlog, DomainError> {
        let now = self.clock.now();

        // Validate against the current state first for a precise error; the
        // store re-applies the patch atomically.
        let mut current = self.require_blog(blog_id).await?;
        current.apply(patch.clone(), now)?;

        let updated = self
            .blogs
            .update(blog_id, patch, now)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => not_found("LiveBlog", blog_id),
                RepoError::Constraint(msg) => DomainError::Conflict(msg),
                other => other.into(),
            })?;

        if !updated.is_live {
            tracing::info!(
                blog_id = %blog_id,
                has_summary = updated.recap().is_some(),
                "Live blog coverage ended"
            );
        }
        Ok(updated)
    }

    pub async fn delete_blog(&self, blog_id: Uuid) -> Result<(), DomainError> {
        self.blogs.delete(blog_id).await.map_err(|e| match e {
            RepoError::NotFound => not_found("LiveBlog", blog_id),
            other => other.into(),
        })?;
        tracing::info!(blog_id = %blog_id, "Live blog deleted");
        Ok(())
    }

    /// Append an entry. Id and timestamp are assigned server-side.
    pub async fn append_entry(
        &self,
        blog_id: Uuid,
        draft: NewTimelineEntry,
    ) -> Result<TimelineEntry, DomainError> {
        draft.validate()?;
        self.require_blog(blog_id).await?;

        let now = self.clock.now();
        let entry = self
            .entries
            .append(blog_id, draft, now)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => not_found("LiveBlog", blog_id),
                other => other.into(),
            })?;
        self.touch_blog(blog_id, entry.created_at).await;

        tracing::info!(
            blog_id = %blog_id,
            entry_id = %entry.id,
            created_at = %entry.created_at,
            "Timeline entry appended"
        );
        Ok(entry)
    }

    /// Pin or unpin an entry. Ordering and `created_at` are unaffected.
    pub async fn set_pinned(
        &self,
        blog_id: Uuid,
        entry_id: Uuid,
        pinned: bool,
    ) -> Result<TimelineEntry, DomainError> {
        let entry = self
            .entries
            .set_pinned(blog_id, entry_id, pinned)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => not_found("TimelineEntry", entry_id),
                other => other.into(),
            })?;
        self.touch_blog(blog_id, self.clock.now()).await;

        tracing::info!(blog_id = %blog_id, entry_id = %entry_id, pinned, "Entry pin changed");
        Ok(entry)
    }

    /// Hard-delete an entry. Clients that already hold it keep it until reload.
    pub async fn delete_entry(&self, blog_id: Uuid, entry_id: Uuid) -> Result<(), DomainError> {
        self.entries
            .delete_entry(blog_id, entry_id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => not_found("TimelineEntry", entry_id),
                other => other.into(),
            })?;
        self.touch_blog(blog_id, self.clock.now()).await;

        tracing::info!(blog_id = %blog_id, entry_id = %entry_id, "Timeline entry deleted");
        Ok(())
    }

    /// Bump the blog's `updated_at` after an entry write. The entry write has
    /// already committed, so a failure here is logged, not returned.
    async fn touch_blog(&self, blog_id: Uuid, at: DateTime<Utc>) {
        if let Err(e) = self.blogs.touch(blog_id, at).await {
            tracing::warn!(blog_id = %blog_id, error = %e, "Failed to bump live blog updated_at");
        }
    }

    async fn require_blog(&self, blog_id: Uuid) -> Result<LiveBlog, DomainError> {
        self.blogs
            .find_by_id(blog_id)
            .await?
            .ok_or_else(|| not_found("LiveBlog", blog_id))
    }
}

fn not_found(entity_type: &'static str, id: Uuid) -> DomainError {
    DomainError::NotFound { entity_type, id }
}
