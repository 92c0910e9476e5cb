//! Editorial endpoints. Every handler requires an [`Editor`].

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use newsdesk_core::domain::{LiveBlogPatch, NewTimelineEntry};
use newsdesk_shared::ApiResponse;
use newsdesk_shared::dto::{
    AppendEntryRequest, AppendEntryResponse, CreateLiveBlogRequest, UpdateEntryRequest,
    UpdateLiveBlogRequest,
};

use super::convert::{entry_response, list_item};
use crate::middleware::auth::Editor;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/admin/live-blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    editor: Editor,
    body: web::Json<CreateLiveBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let blog = state
        .live_blogs
        .create_blog(req.slug, req.title, req.excerpt)
        .await?;

    tracing::info!(editor = %editor.user_id, blog_id = %blog.id, "Live blog opened");
    Ok(HttpResponse::Created().json(ApiResponse::ok(list_item(blog))))
}

/// PATCH /api/admin/live-blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    editor: Editor,
    blog_id: web::Path<Uuid>,
    body: web::Json<UpdateLiveBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = LiveBlogPatch {
        title: req.title,
        excerpt: req.excerpt,
        summary: req.summary,
        is_live: req.is_live,
    };
    let blog = state.live_blogs.update_blog(*blog_id, patch).await?;

    tracing::debug!(editor = %editor.user_id, blog_id = %blog.id, "Live blog updated");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(list_item(blog))))
}

/// DELETE /api/admin/live-blogs/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    editor: Editor,
    blog_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.live_blogs.delete_blog(*blog_id).await?;

    tracing::info!(editor = %editor.user_id, blog_id = %blog_id, "Live blog removed");
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/admin/live-blogs/{id}/entries
///
/// The byline defaults to the posting editor's name.
pub async fn append_entry(
    state: web::Data<AppState>,
    editor: Editor,
    blog_id: web::Path<Uuid>,
    body: web::Json<AppendEntryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = NewTimelineEntry {
        content: req.content,
        image_url: req.image_url,
        image_alt: req.image_alt,
        author_name: req.author_name.or(Some(editor.name)),
    };
    let entry = state.live_blogs.append_entry(*blog_id, draft).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(AppendEntryResponse {
        entry: entry_response(entry),
    })))
}

/// PATCH /api/admin/live-blogs/{id}/entries/{entryId}
pub async fn update_entry(
    state: web::Data<AppState>,
    _editor: Editor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateEntryRequest>,
) -> AppResult<HttpResponse> {
    let (blog_id, entry_id) = path.into_inner();
    let entry = state
        .live_blogs
        .set_pinned(blog_id, entry_id, body.is_pinned)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(entry_response(entry))))
}

/// DELETE /api/admin/live-blogs/{id}/entries/{entryId}
///
/// Readers that already hold the entry keep it until they reload.
pub async fn delete_entry(
    state: web::Data<AppState>,
    _editor: Editor,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (blog_id, entry_id) = path.into_inner();
    state.live_blogs.delete_entry(blog_id, entry_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
