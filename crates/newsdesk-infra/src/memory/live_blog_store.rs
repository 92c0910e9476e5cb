//! In-memory live blog store.
//!
//! Blogs and their timelines share one async `RwLock`, so appends, pin
//! toggles and cascading deletes are atomic with respect to each other.
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use newsdesk_core::domain::{
    LiveBlog, LiveBlogPatch, NewTimelineEntry, TimelineEntry, next_entry_timestamp,
};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::{BaseRepository, LiveBlogRepository, TimelineRepository};

#[derive(Default)]
struct StoreState {
    blogs: HashMap<Uuid, LiveBlog>,
    /// Timeline per blog, kept newest first.
    timelines: HashMap<Uuid, Vec<TimelineEntry>>,
}

/// In-memory implementation of both live blog repositories.
#[derive(Default)]
pub struct InMemoryLiveBlogStore {
    state: RwLock<StoreState>,
}

impl InMemoryLiveBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<LiveBlog, Uuid> for InMemoryLiveBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LiveBlog>, RepoError> {
        let state = self.state.read().await;
        Ok(state.blogs.get(&id).cloned())
    }

    async fn create(&self, blog: LiveBlog) -> Result<LiveBlog, RepoError> {
        let mut state = self.state.write().await;

        if state.blogs.values().any(|b| b.slug == blog.slug) {
            return Err(RepoError::Constraint(format!(
                "Slug '{}' is already taken",
                blog.slug
            )));
        }
        if state.blogs.contains_key(&blog.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        state.timelines.insert(blog.id, Vec::new());
        state.blogs.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        state.blogs.remove(&id).ok_or(RepoError::NotFound)?;
        let removed = state.timelines.remove(&id).map(|t| t.len()).unwrap_or(0);

        tracing::debug!(blog_id = %id, entries = removed, "Live blog removed with its entries");
        Ok(())
    }
}

#[async_trait]
impl LiveBlogRepository for InMemoryLiveBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<LiveBlog>, RepoError> {
        let state = self.state.read().await;
        Ok(state.blogs.values().find(|b| b.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<LiveBlog>, RepoError> {
        let state = self.state.read().await;
        let mut blogs: Vec<LiveBlog> = state.blogs.values().cloned().collect();
        blogs.sort_by(|a, b| {
            b.is_live
                .cmp(&a.is_live)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(blogs)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: LiveBlogPatch,
        now: DateTime<Utc>,
    ) -> Result<LiveBlog, RepoError> {
        let mut state = self.state.write().await;
        let blog = state.blogs.get_mut(&id).ok_or(RepoError::NotFound)?;

        // Apply to a copy so a rejected patch leaves the stored blog untouched.
        let mut updated = blog.clone();
        updated
            .apply(patch, now)
            .map_err(RepoError::rejected)?;
        *blog = updated.clone();
        Ok(updated)
    }

    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if let Some(blog) = state.blogs.get_mut(&id) {
            blog.touch(at);
        }
        Ok(())
    }
}

#[async_trait]
impl TimelineRepository for InMemoryLiveBlogStore {
    async fn entries_since(
        &self,
        blog_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<TimelineEntry>, RepoError> {
        let state = self.state.read().await;
        let Some(timeline) = state.timelines.get(&blog_id) else {
            return Ok(Vec::new());
        };

        let entries = match since {
            Some(cursor) => timeline
                .iter()
                .take_while(|e| e.created_at > cursor)
                .cloned()
                .collect(),
            None => timeline.clone(),
        };
        Ok(entries)
    }

    async fn pinned_ids(&self, blog_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .timelines
            .get(&blog_id)
            .map(|t| t.iter().filter(|e| e.is_pinned).map(|e| e.id).collect())
            .unwrap_or_default())
    }

    async fn append(
        &self,
        blog_id: Uuid,
        draft: NewTimelineEntry,
        now: DateTime<Utc>,
    ) -> Result<TimelineEntry, RepoError> {
        let mut state = self.state.write().await;
        let timeline = state.timelines.get_mut(&blog_id).ok_or(RepoError::NotFound)?;

        let created_at = next_entry_timestamp(now, timeline.first().map(|e| e.created_at));
        let entry = draft.into_entry(blog_id, created_at);
        timeline.insert(0, entry.clone());

        Ok(entry)
    }

    async fn set_pinned(
        &self,
        blog_id: Uuid,
        entry_id: Uuid,
        pinned: bool,
    ) -> Result<TimelineEntry, RepoError> {
        let mut state = self.state.write().await;
        let entry = state
            .timelines
            .get_mut(&blog_id)
            .and_then(|t| t.iter_mut().find(|e| e.id == entry_id))
            .ok_or(RepoError::NotFound)?;

        entry.is_pinned = pinned;
        Ok(entry.clone())
    }

    async fn delete_entry(&self, blog_id: Uuid, entry_id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        let timeline = state.timelines.get_mut(&blog_id).ok_or(RepoError::NotFound)?;

        let before = timeline.len();
        timeline.retain(|e| e.id != entry_id);
        if timeline.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn draft(content: &str) -> NewTimelineEntry {
        NewTimelineEntry {
            content: content.to_string(),
            ..Default::default()
        }
    }

    async fn store_with_blog() -> (InMemoryLiveBlogStore, Uuid) {
        let store = InMemoryLiveBlogStore::new();
        let blog = LiveBlog::new("budget-day".to_string(), "Budget day".to_string(), None, at(0))
            .unwrap();
        let id = blog.id;
        store.create(blog).await.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_entries_since_is_exclusive_and_newest_first() {
        let (store, blog_id) = store_with_blog().await;
        for secs in [10, 20, 30] {
            store.append(blog_id, draft("update"), at(secs)).await.unwrap();
        }

        let all = store.entries_since(blog_id, None).await.unwrap();
        let times: Vec<_> = all.iter().map(|e| e.created_at.timestamp()).collect();
        assert_eq!(times, vec![30, 20, 10]);

        let newer = store.entries_since(blog_id, Some(at(20))).await.unwrap();
        assert_eq!(newer.len(), 1);
        assert_eq!(newer[0].created_at, at(30));

        assert!(store.entries_since(blog_id, Some(at(30))).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let (store, _) = store_with_blog().await;
        let twin = LiveBlog::new("budget-day".to_string(), "Again".to_string(), None, at(1))
            .unwrap();

        let result = store.create(twin).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_concurrent_appends_get_distinct_increasing_timestamps() {
        let (store, blog_id) = store_with_blog().await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                // Same wall-clock instant for every writer.
                store
                    .append(blog_id, draft(&format!("entry {}", i)), at(100))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let timeline = store.entries_since(blog_id, None).await.unwrap();
        assert_eq!(timeline.len(), 16);
        assert!(timeline.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[tokio::test]
    async fn test_pin_toggle_keeps_position() {
        let (store, blog_id) = store_with_blog().await;
        let first = store.append(blog_id, draft("first"), at(10)).await.unwrap();
        store.append(blog_id, draft("second"), at(20)).await.unwrap();

        let pinned = store.set_pinned(blog_id, first.id, true).await.unwrap();
        assert!(pinned.is_pinned);
        assert_eq!(pinned.created_at, first.created_at);

        let timeline = store.entries_since(blog_id, None).await.unwrap();
        assert_eq!(timeline[1].id, first.id);
        assert_eq!(store.pinned_ids(blog_id).await.unwrap(), vec![first.id]);
    }

    #[tokio::test]
    async fn test_unknown_entry_is_not_found() {
        let (store, blog_id) = store_with_blog().await;

        let pin = store.set_pinned(blog_id, Uuid::new_v4(), true).await;
        assert!(matches!(pin, Err(RepoError::NotFound)));

        let delete = store.delete_entry(blog_id, Uuid::new_v4()).await;
        assert!(matches!(delete, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_blog_cascades() {
        let (store, blog_id) = store_with_blog().await;
        store.append(blog_id, draft("entry"), at(10)).await.unwrap();

        store.delete(blog_id).await.unwrap();

        assert!(store.find_by_id(blog_id).await.unwrap().is_none());
        assert!(store.entries_since(blog_id, None).await.unwrap().is_empty());
        let append = store.append(blog_id, draft("late"), at(20)).await;
        assert!(matches!(append, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_rejects_reopen() {
        let (store, blog_id) = store_with_blog().await;
        let end = LiveBlogPatch {
            is_live: Some(false),
            ..Default::default()
        };
        store.update(blog_id, end, at(50)).await.unwrap();

        let reopen = LiveBlogPatch {
            is_live: Some(true),
            title: Some("Back on".to_string()),
            ..Default::default()
        };
        let result = store.update(blog_id, reopen, at(60)).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));

        let stored = store.find_by_id(blog_id).await.unwrap().unwrap();
        assert!(!stored.is_live);
        assert_eq!(stored.title, "Budget day");
    }

    #[tokio::test]
    async fn test_update_with_blank_title_is_invalid() {
        let (store, blog_id) = store_with_blog().await;
        let blank = LiveBlogPatch {
            title: Some("   ".to_string()),
            ..Default::default()
        };

        let result = store.update(blog_id, blank, at(60)).await;
        assert!(matches!(result, Err(RepoError::Invalid(_))));
        assert_eq!(store.find_by_id(blog_id).await.unwrap().unwrap().title, "Budget day");
    }

    #[tokio::test]
    async fn test_list_puts_live_blogs_first() {
        let (store, ended_id) = store_with_blog().await;
        let end = LiveBlogPatch {
            is_live: Some(false),
            ..Default::default()
        };
        store.update(ended_id, end, at(500)).await.unwrap();

        let live = LiveBlog::new("match-day".to_string(), "Match day".to_string(), None, at(5))
            .unwrap();
        store.create(live).await.unwrap();

        let slugs: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.slug)
            .collect();
        assert_eq!(slugs, vec!["match-day", "budget-day"]);
    }
}
