//! One-shot CLI commands that reuse the page pipeline without HTTP.

use dokianime::{FieldSpec, Page, SchemaRegistry};
use serde_json::{json, Value};

use crate::config::ServerConfig;
use crate::state::AppState;

/// Extract a page from the configured documents directory as JSON text.
pub fn extract_json(config: &ServerConfig, page: Page, compact: bool) -> anyhow::Result<String> {
    let state = AppState::new(config.clone())?;
    let data = state.scraper.scrape(page)?;
    let text = if compact {
        serde_json::to_string(&data)?
    } else {
        serde_json::to_string_pretty(&data)?
    };
    Ok(text)
}

/// Summarize the schema registry: page, route, document and field names.
pub fn schemas_summary(registry: &SchemaRegistry) -> Value {
    let pages: Vec<Value> = registry
        .iter()
        .map(|(page, schema)| {
            json!({
                "page": page,
                "route": crate::api::route_path(page),
                "document": schema.document,
                "shape": schema.shape,
                "item": schema.item,
                "fields": field_names(&schema.fields),
            })
        })
        .collect();
    json!({ "pages": pages, "count": registry.len() })
}

fn field_names(fields: &[FieldSpec]) -> Vec<Value> {
    fields
        .iter()
        .map(|f| {
            if f.fields.is_empty() {
                json!(f.name)
            } else {
                json!({ f.name.clone(): field_names(&f.fields) })
            }
        })
        .collect()
}
