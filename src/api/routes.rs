use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_request_body() as usize;

    let mut router = Router::new()
        // Books
        .route("/books", get(handlers::list_books))
        .route(
            "/books",
            post(handlers::create_book).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/books/:id", delete(handlers::delete_book))
        .route("/books/:id", get(handlers::get_book))
        .route(
            "/books/:id",
            put(handlers::update_book).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/books/:id/edit", get(handlers::edit_book))
        .route("/books/:id/pdf", get(handlers::view_pdf))
        // Categories
        .route("/categories", get(handlers::list_categories))
        .route("/categories", post(handlers::create_category))
        // Internal
        .route("/_internal/health", get(handlers::health));

    // Test-only routes
    if state.config.test_mode {
        tracing::warn!("Test mode enabled — purge route is available.");
        router = router.route("/admin/purge", delete(handlers::admin_purge));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
