//! Reads snapshot documents from the documents directory.
//!
//! Documents are re-read on every call; nothing is cached.

use std::path::{Component, Path, PathBuf};

use crate::types::{ScrapeError, ScrapeResult};

/// Resolve a document name inside `dir`.
///
/// Only bare file names are accepted so a schema can never point outside the
/// documents directory.
pub fn document_path(dir: &Path, name: &str) -> ScrapeResult<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(dir.join(name)),
        _ => Err(ScrapeError::InvalidDocumentName(name.to_string())),
    }
}

/// Read the full text of a named document.
pub fn load_document(dir: &Path, name: &str) -> ScrapeResult<String> {
    let path = document_path(dir, name)?;
    tracing::debug!("Loading document {}", path.display());
    std::fs::read_to_string(&path).map_err(|source| ScrapeError::Document {
        path: path.display().to_string(),
        source,
    })
}
