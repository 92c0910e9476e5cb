//! Entry Store contract, exercised through the service over the in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use newsdesk_core::domain::{LiveBlog, LiveBlogPatch, NewTimelineEntry};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::{BaseRepository, Clock, LiveBlogRepository};
use newsdesk_core::{DomainError, LiveBlogService};
use newsdesk_infra::InMemoryLiveBlogStore;

/// Clock the test moves by hand.
struct StepClock(Mutex<DateTime<Utc>>);

impl StepClock {
    fn at(secs: i64) -> Arc<Self> {
        Arc::new(Self(Mutex::new(ts(secs))))
    }

    fn set(&self, secs: i64) {
        *self.0.lock().unwrap() = ts(secs);
    }
}

impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Blog repository whose `updated_at` bump always fails.
struct StaleBlogs(Arc<InMemoryLiveBlogStore>);

#[async_trait]
impl BaseRepository<LiveBlog, Uuid> for StaleBlogs {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LiveBlog>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn create(&self, entity: LiveBlog) -> Result<LiveBlog, RepoError> {
        self.0.create(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.0.delete(id).await
    }
}

#[async_trait]
impl LiveBlogRepository for StaleBlogs {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<LiveBlog>, RepoError> {
        self.0.find_by_slug(slug).await
    }

    async fn list(&self) -> Result<Vec<LiveBlog>, RepoError> {
        self.0.list().await
    }

    async fn update(
        &self,
        id: Uuid,
        patch: LiveBlogPatch,
        now: DateTime<Utc>,
    ) -> Result<LiveBlog, RepoError> {
        self.0.update(id, patch, now).await
    }

    async fn touch(&self, _id: Uuid, _at: DateTime<Utc>) -> Result<(), RepoError> {
        Err(RepoError::Connection("connection reset".to_string()))
    }
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn draft(content: &str) -> NewTimelineEntry {
    NewTimelineEntry {
        content: content.to_string(),
        ..Default::default()
    }
}

fn service(clock: Arc<StepClock>) -> LiveBlogService {
    let store = Arc::new(InMemoryLiveBlogStore::new());
    LiveBlogService::with_clock(store.clone(), store, clock)
}

async fn blog_with_entries_at(
    service: &LiveBlogService,
    clock: &StepClock,
    times: &[i64],
) -> Uuid {
    let blog = service
        .create_blog("storm-watch".to_string(), "Storm watch".to_string(), None)
        .await
        .unwrap();
    for secs in times {
        clock.set(*secs);
        service
            .append_entry(blog.id, draft(&format!("update at {}", secs)))
            .await
            .unwrap();
    }
    blog.id
}

#[tokio::test]
async fn test_poll_with_cursor_is_exclusive() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10, 20, 30]).await;

    let poll = service.poll_entries(blog_id, Some(ts(20))).await.unwrap();
    assert_eq!(poll.entries.len(), 1);
    assert_eq!(poll.entries[0].created_at, ts(30));
    assert!(poll.is_live);

    let poll = service.poll_entries(blog_id, Some(ts(30))).await.unwrap();
    assert!(poll.entries.is_empty());
    assert!(poll.is_live);
}

#[tokio::test]
async fn test_poll_without_cursor_returns_everything_newest_first() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10, 20, 30]).await;

    let poll = service.poll_entries(blog_id, None).await.unwrap();
    let times: Vec<_> = poll.entries.iter().map(|e| e.created_at).collect();
    assert_eq!(times, vec![ts(30), ts(20), ts(10)]);
}

#[tokio::test]
async fn test_repeated_polls_agree() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10, 20, 30, 40]).await;

    let first = service.poll_entries(blog_id, Some(ts(10))).await.unwrap();
    let second = service.poll_entries(blog_id, Some(ts(10))).await.unwrap();
    assert_eq!(first.entries, second.entries);
}

#[tokio::test]
async fn test_all_entries_appended_between_polls_arrive_in_one_poll() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10]).await;

    // Clock stands still while several editors post.
    clock.set(50);
    for i in 0..5 {
        service
            .append_entry(blog_id, draft(&format!("burst {}", i)))
            .await
            .unwrap();
    }

    let poll = service.poll_entries(blog_id, Some(ts(10))).await.unwrap();
    assert_eq!(poll.entries.len(), 5);
}

#[tokio::test]
async fn test_ending_coverage_reports_summary_in_poll() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10]).await;

    let live = service.poll_entries(blog_id, Some(ts(10))).await.unwrap();
    assert!(live.summary.is_none());

    clock.set(60);
    service
        .update_blog(
            blog_id,
            LiveBlogPatch {
                is_live: Some(false),
                summary: Some("Recap text".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ended = service.poll_entries(blog_id, Some(ts(10))).await.unwrap();
    assert!(!ended.is_live);
    assert_eq!(ended.summary.as_deref(), Some("Recap text"));
}

#[tokio::test]
async fn test_reopening_ended_blog_is_a_conflict() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[]).await;

    let end = LiveBlogPatch {
        is_live: Some(false),
        ..Default::default()
    };
    service.update_blog(blog_id, end).await.unwrap();

    let reopen = LiveBlogPatch {
        is_live: Some(true),
        ..Default::default()
    };
    let result = service.update_blog(blog_id, reopen).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_pin_toggle_is_reported_without_redelivery() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10, 20]).await;
    let oldest = service.poll_entries(blog_id, None).await.unwrap().entries[1].clone();

    clock.set(30);
    let pinned = service.set_pinned(blog_id, oldest.id, true).await.unwrap();
    assert_eq!(pinned.created_at, oldest.created_at);

    let poll = service.poll_entries(blog_id, Some(ts(20))).await.unwrap();
    assert!(poll.entries.is_empty());
    assert_eq!(poll.pinned_ids, vec![oldest.id]);
}

#[tokio::test]
async fn test_mutations_bump_blog_updated_at() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10]).await;

    clock.set(90);
    let entry = service.poll_entries(blog_id, None).await.unwrap().entries[0].clone();
    service.delete_entry(blog_id, entry.id).await.unwrap();

    let blogs = service.list().await.unwrap();
    assert_eq!(blogs[0].updated_at, ts(90));
}

#[tokio::test]
async fn test_write_errors() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[]).await;

    let blank = service.append_entry(blog_id, draft("  ")).await;
    assert!(matches!(blank, Err(DomainError::Validation(_))));

    let unknown_blog = service.append_entry(Uuid::new_v4(), draft("text")).await;
    assert!(matches!(unknown_blog, Err(DomainError::NotFound { .. })));

    let unknown_entry = service.set_pinned(blog_id, Uuid::new_v4(), true).await;
    assert!(matches!(unknown_entry, Err(DomainError::NotFound { .. })));

    let duplicate = service
        .create_blog("storm-watch".to_string(), "Twin".to_string(), None)
        .await;
    assert!(matches!(duplicate, Err(DomainError::Duplicate(_))));

    let missing = service.load_by_slug("no-such-blog").await;
    assert!(matches!(missing, Err(DomainError::SlugNotFound(_))));
}

#[tokio::test]
async fn test_delete_blog_cascades_to_entries() {
    let clock = StepClock::at(0);
    let service = service(clock.clone());
    let blog_id = blog_with_entries_at(&service, &clock, &[10, 20]).await;

    service.delete_blog(blog_id).await.unwrap();

    let poll = service.poll_entries(blog_id, None).await;
    assert!(matches!(poll, Err(DomainError::NotFound { .. })));
    assert!(service.load_by_slug("storm-watch").await.is_err());
}

#[tokio::test]
async fn test_entry_writes_succeed_when_updated_at_bump_fails() {
    let store = Arc::new(InMemoryLiveBlogStore::new());
    let service = LiveBlogService::new(Arc::new(StaleBlogs(store.clone())), store);
    let blog = service
        .create_blog("storm-watch".to_string(), "Storm watch".to_string(), None)
        .await
        .unwrap();

    let entry = service.append_entry(blog.id, draft("Gusts of 90mph")).await.unwrap();
    let pinned = service.set_pinned(blog.id, entry.id, true).await.unwrap();
    assert!(pinned.is_pinned);

    let poll = service.poll_entries(blog.id, None).await.unwrap();
    assert_eq!(poll.entries.len(), 1);
    assert_eq!(poll.entries[0].id, entry.id);
    assert_eq!(poll.pinned_ids, vec![entry.id]);

    service.delete_entry(blog.id, entry.id).await.unwrap();
    assert!(service.poll_entries(blog.id, None).await.unwrap().entries.is_empty());
}
