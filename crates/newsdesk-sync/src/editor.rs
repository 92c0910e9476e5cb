//! Editor-side client: posts, pins and removes entries, ends coverage.
//!
//! The desk keeps the editor's own copy of the timeline and only touches it
//! once the store has accepted the write, so a failed request never leaves
//! a phantom entry behind.

use std::sync::Arc;

use async_trait::async_trait;
use newsdesk_shared::dto::{
    AppendEntryRequest, AppendEntryResponse, LiveBlogListItem, LiveBlogResponse,
    TimelineEntryResponse, UpdateEntryRequest, UpdateLiveBlogRequest,
};
use reqwest::{Client, Url};
use uuid::Uuid;

use crate::error::SyncError;
use crate::feed::{decode, endpoint, ensure_success};
use crate::timeline::Timeline;

/// Write side of the entry store.
#[async_trait]
pub trait EditorialApi: Send + Sync {
    async fn append_entry(
        &self,
        blog_id: Uuid,
        request: AppendEntryRequest,
    ) -> Result<TimelineEntryResponse, SyncError>;

    async fn set_pinned(
        &self,
        blog_id: Uuid,
        entry_id: Uuid,
        pinned: bool,
    ) -> Result<TimelineEntryResponse, SyncError>;

    async fn delete_entry(&self, blog_id: Uuid, entry_id: Uuid) -> Result<(), SyncError>;

    async fn update_blog(
        &self,
        blog_id: Uuid,
        request: UpdateLiveBlogRequest,
    ) -> Result<LiveBlogListItem, SyncError>;
}

/// [`EditorialApi`] over the admin HTTP endpoints, authenticated with a
/// Bearer token.
#[derive(Debug, Clone)]
pub struct HttpEditorialApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpEditorialApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn blog_url(&self, blog_id: Uuid, rest: &[&str]) -> Result<Url, SyncError> {
        let blog_id = blog_id.to_string();
        let mut segments = vec!["api", "admin", "live-blogs", blog_id.as_str()];
        segments.extend_from_slice(rest);
        endpoint(&self.base_url, &segments)
    }

    fn entry_url(&self, blog_id: Uuid, entry_id: Uuid) -> Result<Url, SyncError> {
        self.blog_url(blog_id, &["entries", entry_id.to_string().as_str()])
    }
}

#[async_trait]
impl EditorialApi for HttpEditorialApi {
    async fn append_entry(
        &self,
        blog_id: Uuid,
        request: AppendEntryRequest,
    ) -> Result<TimelineEntryResponse, SyncError> {
        let response = self
            .client
            .post(self.blog_url(blog_id, &["entries"])?)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let created: AppendEntryResponse = decode(response).await?;
        Ok(created.entry)
    }

    async fn set_pinned(
        &self,
        blog_id: Uuid,
        entry_id: Uuid,
        pinned: bool,
    ) -> Result<TimelineEntryResponse, SyncError> {
        let response = self
            .client
            .patch(self.entry_url(blog_id, entry_id)?)
            .bearer_auth(&self.token)
            .json(&UpdateEntryRequest { is_pinned: pinned })
            .send()
            .await?;

        decode(response).await
    }

    async fn delete_entry(&self, blog_id: Uuid, entry_id: Uuid) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(self.entry_url(blog_id, entry_id)?)
            .bearer_auth(&self.token)
            .send()
            .await?;

        ensure_success(response).await.map(|_| ())
    }

    async fn update_blog(
        &self,
        blog_id: Uuid,
        request: UpdateLiveBlogRequest,
    ) -> Result<LiveBlogListItem, SyncError> {
        let response = self
            .client
            .patch(self.blog_url(blog_id, &[])?)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        decode(response).await
    }
}

/// The editor's view of one live blog.
pub struct EditorialDesk {
    api: Arc<dyn EditorialApi>,
    blog_id: Uuid,
    is_live: bool,
    summary: Option<String>,
    timeline: Timeline,
}

impl EditorialDesk {
    /// Seed the desk from a full load.
    pub fn new(api: Arc<dyn EditorialApi>, blog: LiveBlogResponse) -> Self {
        Self {
            api,
            blog_id: blog.id,
            is_live: blog.is_live,
            summary: blog.summary,
            timeline: Timeline::from_entries(blog.entries),
        }
    }

    pub fn blog_id(&self) -> Uuid {
        self.blog_id
    }

    pub fn is_live(&self) -> bool {
        self.is_live
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// The editor's list, newest first.
    pub fn entries(&self) -> &[TimelineEntryResponse] {
        self.timeline.entries()
    }

    /// Post an entry. The store assigns its id and timestamp.
    pub async fn post(
        &mut self,
        request: AppendEntryRequest,
    ) -> Result<TimelineEntryResponse, SyncError> {
        let entry = self.api.append_entry(self.blog_id, request).await?;
        self.timeline.merge(vec![entry.clone()]);

        tracing::debug!(blog_id = %self.blog_id, entry_id = %entry.id, "Entry posted");
        Ok(entry)
    }

    /// Flip the pin flag of a held entry. Returns the new flag.
    pub async fn toggle_pin(&mut self, entry_id: Uuid) -> Result<bool, SyncError> {
        let pinned = self
            .timeline
            .entries()
            .iter()
            .find(|e| e.id == entry_id)
            .map(|e| !e.is_pinned)
            .ok_or_else(|| SyncError::NotFound(entry_id.to_string()))?;

        let updated = self.api.set_pinned(self.blog_id, entry_id, pinned).await?;
        self.timeline.set_pinned(entry_id, updated.is_pinned);
        Ok(updated.is_pinned)
    }

    pub async fn remove(&mut self, entry_id: Uuid) -> Result<(), SyncError> {
        self.api.delete_entry(self.blog_id, entry_id).await?;
        self.timeline.remove(entry_id);

        tracing::debug!(blog_id = %self.blog_id, entry_id = %entry_id, "Entry removed");
        Ok(())
    }

    /// End coverage, optionally with a recap, in a single write.
    pub async fn end_coverage(&mut self, summary: Option<String>) -> Result<(), SyncError> {
        let request = UpdateLiveBlogRequest {
            is_live: Some(false),
            summary,
            ..Default::default()
        };
        let blog = self.api.update_blog(self.blog_id, request).await?;

        self.is_live = blog.is_live;
        self.summary = blog.summary;
        tracing::info!(blog_id = %self.blog_id, "Coverage ended");
        Ok(())
    }
}
