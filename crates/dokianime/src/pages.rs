//! Typed page pipeline: load a snapshot, run its schema, return records.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extract::Extractor;
use crate::loader::load_document;
use crate::schema::{Page, SchemaRegistry};
use crate::types::{AnimeInfo, EpisodeSummary, ScrapeResult, SearchResultEntry, StreamInfo};

/// Records extracted from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageData {
    Latest(Vec<EpisodeSummary>),
    Search(Vec<SearchResultEntry>),
    Info(AnimeInfo),
    Stream(StreamInfo),
}

impl PageData {
    /// Number of top-level records (1 for single-record pages).
    pub fn record_count(&self) -> usize {
        match self {
            PageData::Latest(items) => items.len(),
            PageData::Search(items) => items.len(),
            PageData::Info(_) | PageData::Stream(_) => 1,
        }
    }
}

/// Loads snapshot documents and extracts their records.
///
/// Schemas are compiled once when the registry loads; every call re-reads
/// the document. Shared across threads and moved into blocking tasks.
#[derive(Debug, Clone)]
pub struct Scraper {
    registry: SchemaRegistry,
    extractor: Extractor,
    documents_dir: PathBuf,
}

impl Scraper {
    pub fn new(registry: SchemaRegistry, extractor: Extractor, documents_dir: &Path) -> Self {
        Self {
            registry,
            extractor,
            documents_dir: documents_dir.to_path_buf(),
        }
    }

    /// Read the page's document from disk and extract it.
    pub fn scrape(&self, page: Page) -> ScrapeResult<PageData> {
        let schema = self.registry.compiled(page)?;
        let html = load_document(&self.documents_dir, schema.document())?;
        self.parse(page, &html)
    }

    /// Extract a page from already loaded HTML.
    pub fn parse(&self, page: Page, html: &str) -> ScrapeResult<PageData> {
        let schema = self.registry.compiled(page)?;
        let data = match page {
            Page::Latest => PageData::Latest(self.extractor.extract_as(schema, html)?),
            Page::Search => PageData::Search(self.extractor.extract_as(schema, html)?),
            Page::Info => PageData::Info(self.extractor.extract_as(schema, html)?),
            Page::Stream => PageData::Stream(self.extractor.extract_as(schema, html)?),
        };
        tracing::debug!("Page '{page}' produced {} records", data.record_count());
        Ok(data)
    }
}
