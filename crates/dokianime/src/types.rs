//! Output records and error types.

use serde::{Deserialize, Serialize};

/// Placeholder used when a latest-episode card has no episode title.
pub const NO_TITLE: &str = "No title available";

/// Episode type used when an episode card carries no type badge.
pub const DEFAULT_EPISODE_TYPE: &str = "Episode";

/// One card from the "latest episodes" tab of the homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    pub anime_title: String,
    pub image_url: String,
    pub watch_link: String,
    pub anime_details_link: String,
    pub episode_text: String,
    pub episode_title: String,
}

/// One card from the search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultEntry {
    pub title: String,
    pub details_link: String,
    pub image_url: String,
    pub score: String,
    pub year: String,
    pub genres: Vec<String>,
}

/// The anime details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeInfo {
    pub title: String,
    pub poster_image: String,
    pub description: String,
    pub score: String,
    pub rating: String,
    pub year: String,
    pub status: String,
    pub genres: Vec<String>,
    pub episodes: Vec<EpisodeRef>,
}

/// An episode card listed on the anime details page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRef {
    pub title: String,
    pub watch_link: String,
    pub thumbnail: String,
    #[serde(rename = "type")]
    pub episode_type: String,
}

/// The episode streaming page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub anime_title: String,
    pub episode_number: String,
    pub episode_title: String,
    pub stream_sources: Vec<StreamSource>,
    pub episode_list: Vec<EpisodeLink>,
}

/// A video server tab on the streaming page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSource {
    pub server: String,
    pub url: String,
}

/// An entry in the streaming page's episode selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeLink {
    pub episode: String,
    pub link: String,
    pub filler: bool,
}

/// Errors that can occur while loading or extracting a page.
#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to read document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid document name: {0}")]
    InvalidDocumentName(String),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid schema field '{field}': {message}")]
    Schema { field: String, message: String },

    #[error("Schema registry is not valid JSON: {0}")]
    Registry(#[source] serde_json::Error),

    #[error("No element matches '{selector}' in {document}")]
    MissingRoot { document: String, selector: String },

    #[error("Extracted data from {document} does not fit its record type: {source}")]
    Shape {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

/// Convenience result type.
pub type ScrapeResult<T> = Result<T, ScrapeError>;
