use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::database::entity::{live_blog, timeline_entry};
use crate::database::postgres_repo::{PostgresLiveBlogRepository, PostgresTimelineRepository};
use newsdesk_core::domain::{LiveBlog, NewTimelineEntry};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::{BaseRepository, LiveBlogRepository, TimelineRepository};

fn at(secs: i64) -> DateTime<FixedOffset> {
    Utc.timestamp_opt(secs, 0).unwrap().fixed_offset()
}

fn blog_model(id: Uuid, is_live: bool) -> live_blog::Model {
    live_blog::Model {
        id,
        slug: "storm-watch".to_owned(),
        title: "Storm watch".to_owned(),
        excerpt: None,
        summary: None,
        is_live,
        created_at: at(0),
        updated_at: at(0),
    }
}

fn entry_model(blog_id: Uuid, secs: i64, pinned: bool) -> timeline_entry::Model {
    timeline_entry::Model {
        id: Uuid::new_v4(),
        blog_id,
        created_at: at(secs),
        content: format!("update at {}", secs),
        image_url: None,
        image_alt: None,
        author_name: Some("Desk".to_owned()),
        is_pinned: pinned,
    }
}

#[tokio::test]
async fn test_find_live_blog_by_slug() {
    let blog_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![blog_model(blog_id, true)]])
        .into_connection();

    let repo = PostgresLiveBlogRepository::new(db);

    let blog = repo.find_by_slug("storm-watch").await.unwrap().unwrap();
    assert_eq!(blog.id, blog_id);
    assert!(blog.is_live);
}

#[tokio::test]
async fn test_find_live_blog_by_id() {
    let blog_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![blog_model(blog_id, false)]])
        .into_connection();

    let repo = PostgresLiveBlogRepository::new(db);

    let result: Option<LiveBlog> = repo.find_by_id(blog_id).await.unwrap();
    let blog = result.unwrap();
    assert_eq!(blog.title, "Storm watch");
    assert!(!blog.is_live);
}

#[tokio::test]
async fn test_entries_since_maps_rows_in_store_order() {
    let blog_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![entry_model(blog_id, 30, false)]])
        .into_connection();

    let repo = PostgresTimelineRepository::new(db);

    let since = Utc.timestamp_opt(20, 0).unwrap();
    let entries = repo.entries_since(blog_id, Some(since)).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].created_at, Utc.timestamp_opt(30, 0).unwrap());
    assert_eq!(entries[0].author_name.as_deref(), Some("Desk"));
}

#[tokio::test]
async fn test_append_stamps_after_newest_entry() {
    let blog_id = Uuid::new_v4();
    let newest = entry_model(blog_id, 50, false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // SELECT ... FOR UPDATE on the parent blog
        .append_query_results([vec![blog_model(blog_id, true)]])
        // newest existing entry
        .append_query_results([vec![newest]])
        // INSERT ... RETURNING
        .append_query_results([vec![entry_model(blog_id, 50, false)]])
        .into_connection();

    let repo = PostgresTimelineRepository::new(db);

    // Wall clock behind the newest stored entry.
    let now = Utc.timestamp_opt(40, 0).unwrap();
    let draft = NewTimelineEntry {
        content: "Landfall confirmed".to_owned(),
        ..Default::default()
    };
    let entry = repo.append(blog_id, draft, now).await.unwrap();

    assert_eq!(
        entry.created_at,
        Utc.timestamp_opt(50, 0).unwrap() + TimeDelta::microseconds(1)
    );
    assert_eq!(entry.content, "Landfall confirmed");
    assert!(!entry.is_pinned);
}

#[tokio::test]
async fn test_append_to_missing_blog_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<live_blog::Model>::new()])
        .into_connection();

    let repo = PostgresTimelineRepository::new(db);

    let draft = NewTimelineEntry {
        content: "Orphan".to_owned(),
        ..Default::default()
    };
    let result = repo.append(Uuid::new_v4(), draft, Utc::now()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_missing_entry_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresTimelineRepository::new(db);

    let result = repo.delete_entry(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}
