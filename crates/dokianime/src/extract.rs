//! Schema-driven extraction of records from raw HTML.
//!
//! A [`PageSchema`] is plain data; [`CompiledSchema`] turns its selectors and
//! patterns into `scraper`/`regex` objects once. The [`Extractor`] then runs
//! it against any number of documents. Parsed documents are `!Send`, so every
//! entry point here is **synchronous** -- async callers should run it inside
//! `tokio::task::spawn_blocking`.
//!
//! # Field resolution
//!
//! * Scalar fields (text, attribute, pattern) that resolve to nothing or to
//!   an empty string take the field's default (or `""`), unless the field is
//!   marked `skip`, in which case the whole record is dropped.
//! * The base origin is only prefixed onto values that were found, so a
//!   missing link never turns into a bare origin.
//! * List and nested-record fields keep document order.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::schema::{FieldKind, FieldSpec, OnMissing, PageSchema, Shape};
use crate::types::{ScrapeError, ScrapeResult};

/// Origin of the site the snapshots were saved from.
pub const DEFAULT_ORIGIN: &str = "https://anify.to";

// ── Compiled schema ─────────────────────────────────────────────────────────

/// A page schema with every selector and pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    document: String,
    root: Root,
    fields: Vec<CompiledField>,
}

#[derive(Debug, Clone)]
enum Root {
    /// One record per matching element.
    Items(Selector),
    /// A single record from the first matching element.
    First { source: String, selector: Selector },
    /// A single record from the document root.
    Document,
}

#[derive(Debug, Clone)]
struct CompiledField {
    name: String,
    kind: CompiledKind,
    default: Option<String>,
    on_missing: OnMissing,
}

#[derive(Debug, Clone)]
enum CompiledKind {
    Text {
        selector: Option<Selector>,
        first_line: bool,
    },
    Attribute {
        selector: Option<Selector>,
        attr: String,
        prefix_origin: bool,
    },
    List {
        selector: Selector,
    },
    Records {
        selector: Selector,
        fields: Vec<CompiledField>,
    },
    HasClass {
        class: String,
    },
    Pattern {
        selector: Option<Selector>,
        attr: String,
        regex: Regex,
        prefix_origin: bool,
    },
}

impl CompiledKind {
    fn is_scalar(&self) -> bool {
        matches!(
            self,
            CompiledKind::Text { .. } | CompiledKind::Attribute { .. } | CompiledKind::Pattern { .. }
        )
    }
}

impl CompiledSchema {
    /// Compile a schema, rejecting invalid selectors, patterns and field shapes.
    pub fn compile(schema: &PageSchema) -> ScrapeResult<Self> {
        let root = match (schema.shape, schema.item.as_deref()) {
            (Shape::List, Some(item)) => Root::Items(parse_selector(item)?),
            (Shape::List, None) => {
                return Err(ScrapeError::Schema {
                    field: schema.document.clone(),
                    message: "list pages need an item selector".to_string(),
                })
            }
            (Shape::Object, Some(item)) => Root::First {
                source: item.to_string(),
                selector: parse_selector(item)?,
            },
            (Shape::Object, None) => Root::Document,
        };

        let fields = compile_fields(&schema.fields)?;
        if schema.shape == Shape::Object {
            if let Some(field) = fields.iter().find(|f| f.on_missing == OnMissing::Skip) {
                return Err(ScrapeError::Schema {
                    field: field.name.clone(),
                    message: "top-level fields of an object page cannot be skipped".to_string(),
                });
            }
        }

        Ok(Self {
            document: schema.document.clone(),
            root,
            fields,
        })
    }

    /// Name of the document this schema reads.
    pub fn document(&self) -> &str {
        &self.document
    }
}

fn parse_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn compile_fields(specs: &[FieldSpec]) -> ScrapeResult<Vec<CompiledField>> {
    specs.iter().map(compile_field).collect()
}

fn compile_field(spec: &FieldSpec) -> ScrapeResult<CompiledField> {
    let invalid = |message: &str| ScrapeError::Schema {
        field: spec.name.clone(),
        message: message.to_string(),
    };
    let selector = spec.selector.as_deref().map(parse_selector).transpose()?;

    let kind = match spec.kind {
        FieldKind::Text => CompiledKind::Text {
            selector,
            first_line: spec.first_line,
        },
        FieldKind::Attribute => CompiledKind::Attribute {
            selector,
            attr: spec
                .attr
                .clone()
                .ok_or_else(|| invalid("attribute fields need `attr`"))?,
            prefix_origin: spec.prefix_origin,
        },
        FieldKind::List => CompiledKind::List {
            selector: selector.ok_or_else(|| invalid("list fields need `selector`"))?,
        },
        FieldKind::Records => {
            if spec.fields.is_empty() {
                return Err(invalid("records fields need nested `fields`"));
            }
            CompiledKind::Records {
                selector: selector.ok_or_else(|| invalid("records fields need `selector`"))?,
                fields: compile_fields(&spec.fields)?,
            }
        }
        FieldKind::HasClass => CompiledKind::HasClass {
            class: spec
                .class
                .clone()
                .ok_or_else(|| invalid("has_class fields need `class`"))?,
        },
        FieldKind::Pattern => {
            let attr = spec
                .attr
                .clone()
                .ok_or_else(|| invalid("pattern fields need `attr`"))?;
            let pattern = spec
                .regex
                .as_deref()
                .ok_or_else(|| invalid("pattern fields need `regex`"))?;
            let regex = Regex::new(pattern)?;
            if regex.captures_len() < 2 {
                return Err(invalid("pattern needs a capture group"));
            }
            CompiledKind::Pattern {
                selector,
                attr,
                regex,
                prefix_origin: spec.prefix_origin,
            }
        }
    };

    if spec.on_missing == OnMissing::Skip && !kind.is_scalar() {
        return Err(invalid("only text, attribute and pattern fields can be skipped"));
    }

    Ok(CompiledField {
        name: spec.name.clone(),
        kind,
        default: spec.default.clone(),
        on_missing: spec.on_missing,
    })
}

// ── Extractor ───────────────────────────────────────────────────────────────

/// Runs page schemas against HTML, turning relative links into absolute ones.
#[derive(Debug, Clone)]
pub struct Extractor {
    origin: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

impl Extractor {
    /// Create an extractor for the given base origin (trailing `/` is dropped).
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }

    /// Extract a page as untyped JSON.
    pub fn extract(&self, schema: &CompiledSchema, html: &str) -> ScrapeResult<Value> {
        let document = Html::parse_document(html);

        let root = match &schema.root {
            Root::Items(item) => {
                let records: Vec<Value> = document
                    .select(item)
                    .filter_map(|el| self.resolve_record(el, &schema.fields))
                    .map(Value::Object)
                    .collect();
                tracing::debug!("Extracted {} records from {}", records.len(), schema.document);
                return Ok(Value::Array(records));
            }
            Root::First { source, selector } => {
                document
                    .select(selector)
                    .next()
                    .ok_or_else(|| ScrapeError::MissingRoot {
                        document: schema.document.clone(),
                        selector: source.clone(),
                    })?
            }
            Root::Document => document.root_element(),
        };

        // Top-level object fields never skip, so a record is always produced.
        let record = self
            .resolve_record(root, &schema.fields)
            .unwrap_or_default();
        tracing::debug!("Extracted {} fields from {}", record.len(), schema.document);
        Ok(Value::Object(record))
    }

    /// Extract a page and deserialize it into its record type.
    pub fn extract_as<T: DeserializeOwned>(
        &self,
        schema: &CompiledSchema,
        html: &str,
    ) -> ScrapeResult<T> {
        let value = self.extract(schema, html)?;
        serde_json::from_value(value).map_err(|source| ScrapeError::Shape {
            document: schema.document.clone(),
            source,
        })
    }

    /// Resolve every field against one element, or `None` if a skip field is missing.
    fn resolve_record(
        &self,
        element: ElementRef<'_>,
        fields: &[CompiledField],
    ) -> Option<Map<String, Value>> {
        let mut record = Map::new();
        for field in fields {
            let value = match self.resolve_field(element, &field.kind) {
                Some(value) => value,
                None => match field.on_missing {
                    OnMissing::Default => Value::String(field.default.clone().unwrap_or_default()),
                    OnMissing::Skip => {
                        tracing::debug!("Dropping record without '{}'", field.name);
                        return None;
                    }
                },
            };
            record.insert(field.name.clone(), value);
        }
        Some(record)
    }

    fn resolve_field(&self, element: ElementRef<'_>, kind: &CompiledKind) -> Option<Value> {
        match kind {
            CompiledKind::Text {
                selector,
                first_line,
            } => {
                let text = element_text(first_match(element, selector.as_ref())?);
                let text = if *first_line {
                    text.lines().next().unwrap_or_default().trim().to_string()
                } else {
                    text
                };
                non_empty(text).map(Value::String)
            }
            CompiledKind::Attribute {
                selector,
                attr,
                prefix_origin,
            } => {
                let value = first_match(element, selector.as_ref())?.value().attr(attr)?;
                non_empty(value.to_string()).map(|v| Value::String(self.absolute(&v, *prefix_origin)))
            }
            CompiledKind::List { selector } => Some(Value::Array(
                element
                    .select(selector)
                    .map(|el| Value::String(element_text(el)))
                    .collect(),
            )),
            CompiledKind::Records { selector, fields } => Some(Value::Array(
                element
                    .select(selector)
                    .filter_map(|el| self.resolve_record(el, fields))
                    .map(Value::Object)
                    .collect(),
            )),
            CompiledKind::HasClass { class } => {
                Some(Value::Bool(element.value().classes().any(|c| c == class)))
            }
            CompiledKind::Pattern {
                selector,
                attr,
                regex,
                prefix_origin,
            } => {
                let haystack = first_match(element, selector.as_ref())?.value().attr(attr)?;
                let captured = regex.captures(haystack)?.get(1)?.as_str();
                non_empty(captured.to_string())
                    .map(|v| Value::String(self.absolute(&v, *prefix_origin)))
            }
        }
    }

    fn absolute(&self, path: &str, prefix_origin: bool) -> String {
        if prefix_origin {
            format!("{}{}", self.origin, path)
        } else {
            path.to_string()
        }
    }
}

fn first_match<'a>(element: ElementRef<'a>, selector: Option<&Selector>) -> Option<ElementRef<'a>> {
    match selector {
        Some(selector) => element.select(selector).next(),
        None => Some(element),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
