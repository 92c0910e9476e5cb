//! Data Transfer Objects - request/response types for the live blog API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timeline entry as seen by readers and editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntryResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
}

/// Full load of a live blog: metadata plus every entry, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBlogResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub is_live: bool,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<TimelineEntryResponse>,
}

/// Live blog header, used by listings and editorial writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBlogListItem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub is_live: bool,
    pub updated_at: DateTime<Utc>,
}

/// Query string of the incremental poll. Without `since` the full entry set
/// is returned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollEntriesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
}

/// Response of the incremental poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollEntriesResponse {
    /// Entries strictly newer than the cursor, newest first.
    pub entries: Vec<TimelineEntryResponse>,
    pub is_live: bool,
    /// Present once coverage has ended with a recap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Ids of every pinned entry of the blog. Absent means "unknown", not
    /// "nothing pinned".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_ids: Option<Vec<Uuid>>,
}

/// Request to open a new live blog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLiveBlogRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
}

/// Request to edit a live blog. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLiveBlogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_live: Option<bool>,
}

/// Request to post a timeline entry. Timestamps are never accepted from
/// clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendEntryRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    /// Byline override; defaults to the posting editor's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

/// Response of a successful append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendEntryResponse {
    pub entry: TimelineEntryResponse,
}

/// Pin toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub is_pinned: bool,
}
