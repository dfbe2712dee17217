//! DokiAnime: declarative extraction of anime listings from saved HTML snapshots.

pub mod extract;
pub mod loader;
pub mod pages;
pub mod schema;
pub mod types;

pub use extract::{CompiledSchema, Extractor, DEFAULT_ORIGIN};
pub use loader::{document_path, load_document};
pub use pages::{PageData, Scraper};
pub use schema::{FieldKind, FieldSpec, OnMissing, Page, PageSchema, SchemaRegistry, Shape};
pub use types::*;
