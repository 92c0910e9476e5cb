//! HTTP handlers and route configuration.

#[cfg(feature = "auth")]
mod admin;
mod convert;
mod health;
mod live_blogs;


use actix_web::web;

use crate::state::AppState;

#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let poll =
        web::resource("/live-blogs/{id}/entries").route(web::get().to(live_blogs::poll_entries));
    #[cfg(feature = "rate-limit")]
    let poll = poll.wrap(RateLimitMiddleware::new(state.rate_limiter.clone()));
    #[cfg(not(feature = "rate-limit"))]
    let _ = state;

    let api = web::scope("/api")
        // Public routes
        .route("/health", web::get().to(health::health_check))
        .route("/live-blogs", web::get().to(live_blogs::list))
        .service(poll)
        .route("/live-blogs/{slug}", web::get().to(live_blogs::load));

    // Editorial routes
    #[cfg(feature = "auth")]
    let api = api.service(
        web::scope("/admin/live-blogs")
            .route("", web::post().to(admin::create_blog))
            .route("/{id}", web::patch().to(admin::update_blog))
            .route("/{id}", web::delete().to(admin::delete_blog))
            .route("/{id}/entries", web::post().to(admin::append_entry))
            .route("/{id}/entries/{entry_id}", web::patch().to(admin::update_entry))
            .route("/{id}/entries/{entry_id}", web::delete().to(admin::delete_entry)),
    );

    cfg.service(api);
}
