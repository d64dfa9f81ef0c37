//! Parsing of the JSON index definitions accepted by `setIndexConfiguration`.
//!
//! ```json
//! {
//!   "indexes": [{
//!     "collectionGroup": "restaurants",
//!     "queryScope": "COLLECTION",
//!     "fields": [
//!       {"fieldPath": "city", "order": "ASCENDING"},
//!       {"fieldPath": "tags", "arrayConfig": "CONTAINS"}
//!     ]
//!   }],
//!   "fieldOverrides": []
//! }
//! ```

use serde::Deserialize;

use crate::error::FirestoreResult;
use crate::model::{FieldIndex, FieldPath, SegmentKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexConfiguration {
    #[serde(default)]
    indexes: Vec<IndexDefinition>,
    #[serde(default)]
    field_overrides: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexDefinition {
    collection_group: String,
    #[serde(default)]
    fields: Vec<IndexFieldDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexFieldDefinition {
    field_path: String,
    order: Option<String>,
    array_config: Option<String>,
}

/// Parses an index configuration document into field indexes with unassigned
/// ids. Field paths use the server format, so segments may be backtick quoted.
pub fn parse_index_configuration(json: &str) -> FirestoreResult<Vec<FieldIndex>> {
    let configuration: IndexConfiguration = serde_json::from_str(json)?;
    if !configuration.field_overrides.is_empty() {
        log::debug!(
            "Ignoring {} field overrides in index configuration",
            configuration.field_overrides.len()
        );
    }

    let mut indexes = Vec::with_capacity(configuration.indexes.len());
    for definition in configuration.indexes {
        let mut index = FieldIndex::for_collection_group(definition.collection_group);
        for field in definition.fields {
            let field_path = FieldPath::from_server_format(&field.field_path)?;
            match segment_kind(&field) {
                Some(kind) => index = index.with_segment(field_path, kind),
                None => log::warn!(
                    "Ignoring index field {} with unsupported configuration (order: {:?}, arrayConfig: {:?})",
                    field.field_path,
                    field.order,
                    field.array_config
                ),
            }
        }
        indexes.push(index);
    }
    Ok(indexes)
}

fn segment_kind(field: &IndexFieldDefinition) -> Option<SegmentKind> {
    if let Some(array_config) = &field.array_config {
        return (array_config == "CONTAINS").then_some(SegmentKind::Contains);
    }
    match field.order.as_deref() {
        Some("ASCENDING") => Some(SegmentKind::Ascending),
        Some("DESCENDING") => Some(SegmentKind::Descending),
        _ => None,
    }
}
