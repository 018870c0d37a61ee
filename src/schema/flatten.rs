//! Record flattening and projection

use super::registry::TableSchema;
use crate::types::{JsonObject, JsonValue};

/// Flatten nested objects into `parent_child` keys.
///
/// Arrays and scalars are kept as they are. A record that is not an object
/// flattens to an empty map.
pub fn flatten(record: &JsonValue) -> JsonObject {
    let mut out = JsonObject::new();
    if let JsonValue::Object(map) = record {
        for (key, value) in map {
            flatten_into(value, key, &mut out);
        }
    }
    out
}

fn flatten_into(value: &JsonValue, prefix: &str, out: &mut JsonObject) {
    match value {
        JsonValue::Object(map) if !map.is_empty() => {
            for (key, inner) in map {
                flatten_into(inner, &format!("{prefix}_{key}"), out);
            }
        }
        // An empty object contributes no leaves
        JsonValue::Object(_) => {}
        other => {
            out.insert(prefix.to_string(), other.clone());
        }
    }
}

impl TableSchema {
    /// Project one API record onto this table's fields.
    ///
    /// JSON fields are serialized from the unflattened record, then `extra`
    /// parent values are merged over the flattened record. Fields the record
    /// lacks come back as `Null`.
    pub fn project(&self, record: &JsonValue, extra: &JsonObject) -> Vec<JsonValue> {
        let mut flat = flatten(record);

        for field in self.json_fields {
            let raw = record.get(*field).unwrap_or(&JsonValue::Null);
            flat.insert(
                (*field).to_string(),
                JsonValue::String(raw.to_string()),
            );
        }

        for (key, value) in extra {
            flat.insert(key.clone(), value.clone());
        }

        self.source_fields
            .iter()
            .map(|field| flat.remove(*field).unwrap_or(JsonValue::Null))
            .collect()
    }
}
