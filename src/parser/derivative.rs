use crate::error::LoadError;
use crate::model::{PropertyBag, PropertyDatabase, PropertyValue};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Key under which an object's display name is stored in its bag.
pub const NAME_KEY: &str = "__name";

/// Key under which an object's external id is stored in its bag.
pub const EXTERNAL_ID_KEY: &str = "__externalId";

const KEY_FIELDS: &[&str] = &["displayName", "attributeName", "name"];
const VALUE_FIELDS: &[&str] = &["displayValue", "value", "defaultValue"];

/// Loads a model-derivative properties dump into a property database.
///
/// Accepts the full response (`{"data": {"collection": [...]}}`), the bare
/// collection object, or the collection array itself.
///
/// # Errors
///
/// Returns [`LoadError::FileRead`] if the file cannot be read,
/// [`LoadError::InvalidJson`] if it is not JSON, and
/// [`LoadError::UnexpectedShape`] if no collection array is found.
///
/// # Example
///
/// ```no_run
/// use bim_assistant::parser::load_property_database;
///
/// let db = load_property_database("properties.json")?;
/// println!("{} elements", db.len());
/// # Ok::<(), bim_assistant::error::LoadError>(())
/// ```
pub fn load_property_database<P: AsRef<Path>>(path: P) -> Result<PropertyDatabase, LoadError> {
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

    let db = flatten_properties(&value)?;
    info!(path = %path_ref.display(), elements = db.len(), "property database loaded");
    Ok(db)
}

/// Flattens every object of a properties collection into one bag per
/// object id. Objects without an integer `objectid` are skipped.
pub fn flatten_properties(value: &Value) -> Result<PropertyDatabase, LoadError> {
    let collection = collection(value).ok_or_else(|| LoadError::UnexpectedShape {
        message: "expected a properties collection array".to_string(),
    })?;

    let mut db = PropertyDatabase::new();
    for object in collection {
        let Some(id) = object.get("objectid").and_then(Value::as_u64) else {
            debug!("skipping properties object without objectid");
            continue;
        };
        // Repeated ids merge into one bag.
        db.entry(id).or_default().extend(flatten_object(object));
    }
    Ok(db)
}

fn collection(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => map
            .get("data")
            .and_then(|data| data.get("collection"))
            .or_else(|| map.get("collection"))
            .and_then(Value::as_array),
        _ => None,
    }
}

fn flatten_object(object: &Value) -> PropertyBag {
    let mut bag = PropertyBag::new();

    if let Some(name) = object.get("name").and_then(PropertyValue::from_json) {
        bag.insert(NAME_KEY.to_string(), name);
    }
    if let Some(external) = object.get("externalId").and_then(PropertyValue::from_json) {
        bag.insert(EXTERNAL_ID_KEY.to_string(), external);
    }

    let Some(groups) = object.get("properties").and_then(Value::as_object) else {
        return bag;
    };

    for group in groups.values() {
        match group {
            Value::Array(props) => {
                for prop in props {
                    let Some(prop) = prop.as_object() else { continue };
                    let key = first_text(prop, KEY_FIELDS);
                    let value = first_value(prop);
                    if let (Some(key), Some(value)) = (key, value) {
                        bag.insert(key, value);
                    }
                }
            }
            Value::Object(props) => {
                for (prop_name, prop) in props {
                    let (key, value) = match prop {
                        Value::Object(fields) => (
                            first_text(fields, &["displayName"])
                                .unwrap_or_else(|| prop_name.clone()),
                            first_value(fields),
                        ),
                        scalar => (prop_name.clone(), PropertyValue::from_json(scalar)),
                    };
                    if let Some(value) = value {
                        bag.insert(key, value);
                    }
                }
            }
            _ => {}
        }
    }

    bag
}

fn first_text(fields: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(ToString::to_string)
}

fn first_value(fields: &Map<String, Value>) -> Option<PropertyValue> {
    VALUE_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(PropertyValue::from_json)
}
