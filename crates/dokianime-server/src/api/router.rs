//! Route table.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use dokianime::Page;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

/// Path each page is served at.
pub fn route_path(page: Page) -> &'static str {
    match page {
        Page::Latest => "/api/latest",
        Page::Search => "/api/search",
        Page::Info => "/api/info",
        Page::Stream => "/api/stream",
    }
}

/// Build the router: one GET route per page, `/health`, and the public
/// directory for everything else.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new().route("/health", get(handlers::health));
    for page in Page::ALL {
        router = router.route(
            route_path(page),
            get(move |State(state): State<Arc<AppState>>| handlers::scrape_page(state, page)),
        );
    }

    let public = ServeDir::new(&state.config.public_dir);
    router
        .fallback_service(public)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
