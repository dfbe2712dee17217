//! Mapping of extraction failures to HTTP responses.
//!
//! Every failure collapses into a 500 with a fixed per-page message; the
//! underlying cause is only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use dokianime::{Page, ScrapeError};

/// Errors returned by the page endpoints.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Failed to scrape {page}: {source}")]
    Scrape {
        page: Page,
        #[source]
        source: ScrapeError,
    },

    #[error("Scrape task for {page} did not complete: {message}")]
    Task { page: Page, message: String },
}

impl ApiError {
    pub fn page(&self) -> Page {
        match self {
            ApiError::Scrape { page, .. } | ApiError::Task { page, .. } => *page,
        }
    }
}

/// Message returned to clients when a page cannot be produced.
pub fn failure_message(page: Page) -> &'static str {
    match page {
        Page::Latest => "Failed to scrape latest data.",
        Page::Search => "Failed to scrape search data.",
        Page::Info => "Failed to scrape anime info.",
        Page::Stream => "Failed to scrape streaming page.",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": failure_message(self.page()) })),
        )
            .into_response()
    }
}
