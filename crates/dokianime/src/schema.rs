//! Declarative page schemas.
//!
//! A schema names the snapshot document a page is read from, the selector of
//! its repeating item, and an ordered list of field descriptors. The four
//! built-in schemas are embedded at compile time from `schemas.json`, so
//! adding or adjusting a page is a data change rather than a new handler.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::extract::CompiledSchema;
use crate::loader::document_path;
use crate::types::{ScrapeError, ScrapeResult};

/// Raw JSON content of the built-in page schemas.
const SCHEMAS_JSON: &str = include_str!("schemas.json");

/// The pages served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Latest,
    Search,
    Info,
    Stream,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Latest, Page::Search, Page::Info, Page::Stream];

    pub fn name(self) -> &'static str {
        match self {
            Page::Latest => "latest",
            Page::Search => "search",
            Page::Info => "info",
            Page::Stream => "stream",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScrapeError::UnknownPage(s.to_string()))
    }
}

/// Whether a page yields one record per item or a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    List,
    Object,
}

/// How a field's value is obtained from its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Trimmed text of the first match.
    Text,
    /// Value of `attr` on the first match.
    Attribute,
    /// Trimmed text of every match, in document order.
    List,
    /// Nested records, one per match, resolved with `fields`.
    Records,
    /// Whether the element itself carries `class`.
    HasClass,
    /// First capture group of `regex` applied to `attr`.
    Pattern,
}

/// What happens when a scalar field resolves to nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnMissing {
    /// Use the field's `default`, or an empty string.
    #[default]
    Default,
    /// Drop the whole record.
    Skip,
}

/// One field descriptor.
///
/// `selector` is resolved relative to the record's element; when absent the
/// element itself is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Keep only the text before the first line break.
    #[serde(default)]
    pub first_line: bool,
    /// Prepend the base origin to the extracted path.
    #[serde(default)]
    pub prefix_origin: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub on_missing: OnMissing,
}

/// Schema of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSchema {
    /// File name of the snapshot inside the documents directory.
    pub document: String,
    pub shape: Shape,
    /// Selector of the repeating item. Object pages default to the root element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub fields: Vec<FieldSpec>,
}

/// All page schemas, keyed by page, with their compiled form.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<Page, PageSchema>,
    compiled: BTreeMap<Page, CompiledSchema>,
}

impl SchemaRegistry {
    /// Load and validate the embedded schemas.
    pub fn builtin() -> ScrapeResult<Self> {
        Self::from_json(SCHEMAS_JSON)
    }

    /// Parse a registry from JSON and check that every selector and pattern compiles.
    pub fn from_json(json: &str) -> ScrapeResult<Self> {
        let schemas: BTreeMap<Page, PageSchema> =
            serde_json::from_str(json).map_err(ScrapeError::Registry)?;
        let mut compiled = BTreeMap::new();
        for (page, schema) in &schemas {
            document_path(Path::new(""), &schema.document)?;
            compiled.insert(*page, CompiledSchema::compile(schema)?);
            tracing::debug!(
                "Schema '{page}' validated ({} fields, document {})",
                schema.fields.len(),
                schema.document
            );
        }
        Ok(Self { schemas, compiled })
    }

    pub fn get(&self, page: Page) -> ScrapeResult<&PageSchema> {
        self.schemas
            .get(&page)
            .ok_or_else(|| ScrapeError::UnknownPage(page.to_string()))
    }

    /// Compiled form of a page schema, built once when the registry loads.
    pub fn compiled(&self, page: Page) -> ScrapeResult<&CompiledSchema> {
        self.compiled
            .get(&page)
            .ok_or_else(|| ScrapeError::UnknownPage(page.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Page, &PageSchema)> {
        self.schemas.iter().map(|(page, schema)| (*page, schema))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
