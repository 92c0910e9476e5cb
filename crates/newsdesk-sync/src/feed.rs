//! Transport between the sync client and the entry store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsdesk_shared::dto::{LiveBlogResponse, PollEntriesQuery, PollEntriesResponse};
use newsdesk_shared::{ApiResponse, ErrorResponse};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::SyncError;

/// Read side of the entry store as the sync client sees it.
#[async_trait]
pub trait EntryFeed: Send + Sync {
    /// Full load: blog header and every entry, newest first.
    async fn load(&self, slug: &str) -> Result<LiveBlogResponse, SyncError>;

    /// Entries strictly newer than `since`, plus current live state.
    async fn poll(
        &self,
        blog_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<PollEntriesResponse, SyncError>;
}

/// [`EntryFeed`] over the public HTTP API.
#[derive(Debug, Clone)]
pub struct HttpEntryFeed {
    client: Client,
    base_url: String,
}

impl HttpEntryFeed {
    /// `base_url` is the server root, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EntryFeed for HttpEntryFeed {
    async fn load(&self, slug: &str) -> Result<LiveBlogResponse, SyncError> {
        let url = endpoint(&self.base_url, &["api", "live-blogs", slug])?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SyncError::NotFound(slug.to_string()));
        }
        decode(response).await
    }

    async fn poll(
        &self,
        blog_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<PollEntriesResponse, SyncError> {
        let blog_id = blog_id.to_string();
        let url = endpoint(&self.base_url, &["api", "live-blogs", blog_id.as_str(), "entries"])?;
        let response = self
            .client
            .get(url)
            .query(&PollEntriesQuery { since })
            .send()
            .await?;

        decode(response).await
    }
}

/// Append path segments to the server root, percent-encoding each one.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, SyncError> {
    let mut url = Url::parse(base_url).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SyncError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Pass a 2xx response through, or turn a problem document into
/// [`SyncError::Api`].
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let problem = response.json::<ErrorResponse>().await.ok();
    Err(match problem {
        Some(problem) => SyncError::Api {
            status: problem.status,
            title: problem.title,
            detail: problem.detail.unwrap_or_default(),
        },
        None => SyncError::Api {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: String::new(),
        },
    })
}

/// Unwrap the payload of an `ApiResponse` body.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
    let body: ApiResponse<T> = ensure_success(response)
        .await?
        .json()
        .await
        .map_err(|e| SyncError::Decode(e.to_string()))?;

    body.into_data()
        .ok_or_else(|| SyncError::Decode("response carried no data".to_string()))
}
