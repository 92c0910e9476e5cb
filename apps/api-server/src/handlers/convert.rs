//! Domain to wire conversions.

use newsdesk_core::domain::{LiveBlog, TimelineEntry};
use newsdesk_core::service::{EntryPoll, LiveBlogView};
use newsdesk_shared::dto::{
    LiveBlogListItem, LiveBlogResponse, PollEntriesResponse, TimelineEntryResponse,
};

pub fn entry_response(entry: TimelineEntry) -> TimelineEntryResponse {
    TimelineEntryResponse {
        id: entry.id,
        created_at: entry.created_at,
        content: entry.content,
        image_url: entry.image_url,
        image_alt: entry.image_alt,
        author_name: entry.author_name,
        is_pinned: entry.is_pinned,
    }
}

pub fn list_item(blog: LiveBlog) -> LiveBlogListItem {
    LiveBlogListItem {
        id: blog.id,
        summary: blog.recap().map(str::to_string),
        slug: blog.slug,
        title: blog.title,
        excerpt: blog.excerpt,
        is_live: blog.is_live,
        updated_at: blog.updated_at,
    }
}

pub fn blog_response(view: LiveBlogView) -> LiveBlogResponse {
    let LiveBlogView { blog, entries } = view;
    LiveBlogResponse {
        id: blog.id,
        summary: blog.recap().map(str::to_string),
        slug: blog.slug,
        title: blog.title,
        excerpt: blog.excerpt,
        is_live: blog.is_live,
        updated_at: blog.updated_at,
        entries: entries.into_iter().map(entry_response).collect(),
    }
}

pub fn poll_response(poll: EntryPoll) -> PollEntriesResponse {
    PollEntriesResponse {
        entries: poll.entries.into_iter().map(entry_response).collect(),
        is_live: poll.is_live,
        summary: poll.summary,
        pinned_ids: Some(poll.pinned_ids),
    }
}
