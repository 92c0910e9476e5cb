//! Public live blog endpoints: listing, full load and incremental poll.

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use newsdesk_shared::ApiResponse;
use newsdesk_shared::dto::PollEntriesQuery;

use super::convert::{blog_response, list_item, poll_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/live-blogs
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let blogs = state.live_blogs.list().await?;
    let items: Vec<_> = blogs.into_iter().map(list_item).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(items)))
}

/// GET /api/live-blogs/{slug}
pub async fn load(state: web::Data<AppState>, slug: web::Path<String>) -> AppResult<HttpResponse> {
    let view = state.live_blogs.load_by_slug(&slug).await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ApiResponse::ok(blog_response(view))))
}

/// GET /api/live-blogs/{id}/entries?since=<RFC3339>
///
/// Entries strictly newer than `since`, newest first, with the current live
/// state and pinned ids.
pub async fn poll_entries(
    state: web::Data<AppState>,
    blog_id: web::Path<Uuid>,
    query: web::Query<PollEntriesQuery>,
) -> AppResult<HttpResponse> {
    let poll = state
        .live_blogs
        .poll_entries(blog_id.into_inner(), query.into_inner().since)
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(ApiResponse::ok(poll_response(poll))))
}
