//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use uuid::Uuid;

use newsdesk_core::domain::{
    LiveBlog, LiveBlogPatch, NewTimelineEntry, TimelineEntry, next_entry_timestamp,
};
use newsdesk_core::error::RepoError;
use newsdesk_core::ports::{LiveBlogRepository, TimelineRepository};

use super::entity::live_blog::{self, Entity as LiveBlogEntity};
use super::entity::timeline_entry::{self, Entity as TimelineEntryEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL live blog repository.
pub type PostgresLiveBlogRepository = PostgresBaseRepository<LiveBlogEntity>;

#[async_trait]
impl LiveBlogRepository for PostgresLiveBlogRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<LiveBlog>, RepoError> {
        tracing::debug!(slug = %slug, "Finding live blog by slug");

        let result = LiveBlogEntity::find()
            .filter(live_blog::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<LiveBlog>, RepoError> {
        let result = LiveBlogEntity::find()
            .order_by_desc(live_blog::Column::IsLive)
            .order_by_desc(live_blog::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: LiveBlogPatch,
        now: DateTime<Utc>,
    ) -> Result<LiveBlog, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        let model = LiveBlogEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        let mut blog: LiveBlog = model.into();
        blog.apply(patch, now)
            .map_err(RepoError::rejected)?;

        let active: live_blog::ActiveModel = blog.into();
        let updated = active.update(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        Ok(updated.into())
    }

    async fn touch(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), RepoError> {
        LiveBlogEntity::update_many()
            .col_expr(live_blog::Column::UpdatedAt, Expr::value(at))
            .filter(live_blog::Column::Id.eq(id))
            .filter(live_blog::Column::UpdatedAt.lt(at))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(())
    }
}

/// PostgreSQL timeline repository.
pub struct PostgresTimelineRepository {
    db: DbConn,
}

impl PostgresTimelineRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimelineRepository for PostgresTimelineRepository {
    async fn entries_since(
        &self,
        blog_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<TimelineEntry>, RepoError> {
        let mut query =
            TimelineEntryEntity::find().filter(timeline_entry::Column::BlogId.eq(blog_id));
        if let Some(cursor) = since {
            query = query.filter(timeline_entry::Column::CreatedAt.gt(cursor));
        }

        let result = query
            .order_by_desc(timeline_entry::Column::CreatedAt)
            .order_by_desc(timeline_entry::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn pinned_ids(&self, blog_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        TimelineEntryEntity::find()
            .select_only()
            .column(timeline_entry::Column::Id)
            .filter(timeline_entry::Column::BlogId.eq(blog_id))
            .filter(timeline_entry::Column::IsPinned.eq(true))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(repo_err)
    }

    async fn append(
        &self,
        blog_id: Uuid,
        draft: NewTimelineEntry,
        now: DateTime<Utc>,
    ) -> Result<TimelineEntry, RepoError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        // The row lock on the parent blog serializes appends per blog, which
        // makes reading the newest timestamp and inserting after it atomic.
        LiveBlogEntity::find_by_id(blog_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        let newest = TimelineEntryEntity::find()
            .filter(timeline_entry::Column::BlogId.eq(blog_id))
            .order_by_desc(timeline_entry::Column::CreatedAt)
            .one(&txn)
            .await
            .map_err(repo_err)?
            .map(|m| DateTime::<Utc>::from(m.created_at));

        let entry = draft.into_entry(blog_id, next_entry_timestamp(now, newest));
        let active: timeline_entry::ActiveModel = entry.clone().into();
        active.insert(&txn).await.map_err(repo_err)?;
        txn.commit().await.map_err(repo_err)?;

        tracing::debug!(blog_id = %blog_id, entry_id = %entry.id, "Timeline entry inserted");
        Ok(entry)
    }

    async fn set_pinned(
        &self,
        blog_id: Uuid,
        entry_id: Uuid,
        pinned: bool,
    ) -> Result<TimelineEntry, RepoError> {
        let model = TimelineEntryEntity::find_by_id(entry_id)
            .filter(timeline_entry::Column::BlogId.eq(blog_id))
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active: timeline_entry::ActiveModel = model.into();
        active.is_pinned = Set(pinned);
        let updated = active.update(&self.db).await.map_err(repo_err)?;

        Ok(updated.into())
    }

    async fn delete_entry(&self, blog_id: Uuid, entry_id: Uuid) -> Result<(), RepoError> {
        let result = TimelineEntryEntity::delete_many()
            .filter(timeline_entry::Column::Id.eq(entry_id))
            .filter(timeline_entry::Column::BlogId.eq(blog_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
