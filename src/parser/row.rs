//! Row parser: one delimited string or structured record into an
//! [`ElementRecord`].
//!
//! Rows look like `42,"Basic Wall","Revit 벽","Category:Revit 벽|Thickness:150"`
//! or `{"id": 42, "name": ..., "category": ..., "meta": "..."}` or the same
//! four fields as a positional array. The `meta` field is a `key:value|key:value`
//! mini-syntax; a row without it is skipped.

use crate::error::LoadError;
use crate::model::{
    ElementRecord, PropertyBag, PropertyValue, UNKNOWN_CATEGORY, WALL_RECORD_CATEGORY,
};
use crate::normalize::{value_to_millimetres, value_to_number, Normalizer};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Which rows a parse admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every row with metadata.
    #[default]
    Generic,
    /// Only rows whose category or name names a wall.
    Wall,
}

/// The four positional fields of a row, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub meta: Option<String>,
}

impl RowFields {
    /// Splits a comma-delimited row. Double quotes group text containing
    /// commas and are removed from the field.
    #[must_use]
    pub fn from_delimited(line: &str) -> Self {
        let mut parts = split_delimited(line).into_iter();
        Self {
            id: parts.next(),
            name: parts.next(),
            category: parts.next(),
            meta: parts.next(),
        }
    }

    /// Reads a JSON row: a delimited string, a positional array or a named
    /// object. Other JSON values carry no row.
    #[must_use]
    pub fn from_value(row: &Value) -> Option<Self> {
        match row {
            Value::String(line) => Some(Self::from_delimited(line)),
            Value::Array(items) => Some(Self {
                id: items.first().and_then(scalar_text),
                name: items.get(1).and_then(scalar_text),
                category: items.get(2).and_then(scalar_text),
                meta: items.get(3).and_then(scalar_text),
            }),
            Value::Object(map) => {
                let field = |name: &str, index: &str| {
                    map.get(name)
                        .filter(|v| !v.is_null())
                        .or_else(|| map.get(index))
                        .and_then(scalar_text)
                };
                Some(Self {
                    id: field("id", "0"),
                    name: field("name", "1"),
                    category: field("category", "2"),
                    meta: field("meta", "3"),
                })
            }
            _ => None,
        }
    }
}

/// Splits on commas outside double quotes. Fields are trimmed and empty
/// fields keep their position.
#[must_use]
pub fn split_delimited(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Builds a property bag from `key:value|key:value`.
///
/// Each chunk splits on its first colon; chunks without a colon or with an
/// empty key are dropped. A repeated key keeps its last value.
#[must_use]
pub fn parse_meta(raw: &str) -> PropertyBag {
    raw.split('|')
        .filter_map(|chunk| {
            let (key, value) = chunk.split_once(':')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), PropertyValue::from(value.trim())))
        })
        .collect()
}

/// Parses one JSON row. Returns `None` for rows that are skipped.
#[must_use]
pub fn parse_row(row: &Value, scope: Scope, normalizer: &Normalizer) -> Option<ElementRecord> {
    let Some(fields) = RowFields::from_value(row) else {
        debug!(kind = json_kind(row), "skipping row that is not a string, array or object");
        return None;
    };
    parse_fields(fields, scope, normalizer)
}

/// Interprets already-split row fields.
#[must_use]
pub fn parse_fields(fields: RowFields, scope: Scope, normalizer: &Normalizer) -> Option<ElementRecord> {
    let Some(raw_meta) = non_empty(fields.meta) else {
        debug!(id = ?fields.id, "skipping row without metadata");
        return None;
    };
    let meta = parse_meta(&raw_meta);

    let Some(id) = fields.id.as_deref().and_then(parse_id) else {
        debug!(id = ?fields.id, "skipping row without an integer id");
        return None;
    };

    let name = non_empty(fields.name).or_else(|| normalizer.resolve_name(&meta));
    let category = non_empty(fields.category).or_else(|| normalizer.backfill_category(&meta));

    if scope == Scope::Wall {
        let names_wall = |text: &Option<String>| {
            text.as_deref().is_some_and(|t| normalizer.is_wall_text(t))
        };
        if !names_wall(&category) && !names_wall(&name) {
            debug!(id, "skipping non-wall row");
            return None;
        }
    }

    let type_name = non_empty(normalizer.type_name.text(&meta));
    let texts = [name.as_deref(), type_name.as_deref()];

    // Wall rows carry lengths in millimetres unless a unit says otherwise.
    let (thickness, width, height, default_category) = match scope {
        Scope::Generic => (
            normalizer.thickness_raw(&meta, &texts),
            normalizer.width.number(&meta),
            normalizer.height.candidates(&meta).find_map(value_to_number),
            UNKNOWN_CATEGORY,
        ),
        Scope::Wall => (
            normalizer.row_thickness_mm(&meta, &texts).map(f64::round),
            normalizer.width.candidates(&meta).find_map(value_to_millimetres),
            normalizer.height.candidates(&meta).find_map(value_to_millimetres),
            WALL_RECORD_CATEGORY,
        ),
    };

    Some(ElementRecord {
        id,
        category: category.unwrap_or_else(|| default_category.to_string()),
        level: non_empty(normalizer.level.text(&meta)),
        width,
        thickness,
        height,
        area: normalizer.area.number(&meta),
        volume: normalizer.volume.number(&meta),
        name,
        type_name,
        meta,
    })
}

/// Reads a row batch from a JSON file: either a bare array or an object
/// with a `rows` field. Shape checks on the batch are left to collection.
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Value, LoadError> {
    let path_ref = path.as_ref();
    let content = std::fs::read_to_string(path_ref).map_err(|source| LoadError::FileRead {
        path: path_ref.to_path_buf(),
        source,
    })?;
    let value: Value =
        serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson {
            path: path_ref.to_path_buf(),
            source,
        })?;

    Ok(match value {
        Value::Object(mut map) if map.contains_key("rows") => {
            map.remove("rows").unwrap_or(Value::Null)
        }
        other => other,
    })
}

fn parse_id(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "");
    let cleaned = cleaned.trim();
    cleaned.parse::<u64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite() && *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as u64)
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
