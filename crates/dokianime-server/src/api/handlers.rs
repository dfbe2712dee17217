//! Request handlers.

use std::sync::Arc;

use axum::response::Json;
use dokianime::{Page, PageData};
use serde_json::Value;

use super::error::ApiError;
use crate::state::AppState;

/// Load and extract one page.
///
/// Parsed documents are `!Send`, so the work runs on the blocking pool and
/// the handler future only holds the join handle.
pub async fn scrape_page(state: Arc<AppState>, page: Page) -> Result<Json<PageData>, ApiError> {
    let scraper = Arc::clone(&state.scraper);
    match tokio::task::spawn_blocking(move || scraper.scrape(page)).await {
        Ok(Ok(data)) => {
            tracing::debug!("Served {page} ({} records)", data.record_count());
            Ok(Json(data))
        }
        Ok(Err(source)) => {
            tracing::error!("Error scraping {page} data: {source}");
            Err(ApiError::Scrape { page, source })
        }
        Err(e) => {
            tracing::error!("Scrape task for {page} failed: {e}");
            Err(ApiError::Task {
                page,
                message: e.to_string(),
            })
        }
    }
}

/// Health check.
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
