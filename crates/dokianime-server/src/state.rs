//! Shared application state.

use std::sync::Arc;

use dokianime::{Extractor, SchemaRegistry, ScrapeResult, Scraper};

use crate::config::ServerConfig;

/// State shared by every handler. Immutable after startup.
pub struct AppState {
    pub config: ServerConfig,
    pub scraper: Arc<Scraper>,
}

impl AppState {
    /// Build state from a resolved configuration, validating the page schemas.
    pub fn new(config: ServerConfig) -> ScrapeResult<Self> {
        let registry = SchemaRegistry::builtin()?;
        let extractor = Extractor::new(config.origin.clone());
        let scraper = Scraper::new(registry, extractor, &config.documents_dir);
        Ok(Self {
            config,
            scraper: Arc::new(scraper),
        })
    }
}
