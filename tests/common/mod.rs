//! Builders shared by the integration tests.
#![allow(dead_code)]

use firestore_local_rs::core::{FilterOperator, OrderDirection, Query};
use firestore_local_rs::model::mutation::{
    FieldTransform, Mutation, NumericOperand, TransformOperation,
};
use firestore_local_rs::model::{
    DocumentKey, FieldIndex, FieldMask, FieldPath, MutableDocument, ObjectValue, SegmentKind,
    SnapshotVersion, Timestamp,
};
use firestore_local_rs::value::FirestoreValue;

/// A field entry in a test write: a plain value, a field deletion or a
/// transform.
#[derive(Clone, Debug)]
pub enum Entry {
    Value(FirestoreValue),
    Delete,
    Transform(TransformOperation),
}

pub fn string(value: &str) -> Entry {
    Entry::Value(FirestoreValue::from_string(value))
}

pub fn int(value: i64) -> Entry {
    Entry::Value(FirestoreValue::from_integer(value))
}

pub fn double(value: f64) -> Entry {
    Entry::Value(FirestoreValue::from_double(value))
}

pub fn map(entries: &[(&str, Entry)]) -> Entry {
    Entry::Value(object(entries).to_value())
}

pub fn delete_field() -> Entry {
    Entry::Delete
}

pub fn server_timestamp() -> Entry {
    Entry::Transform(TransformOperation::ServerTimestamp)
}

pub fn increment(value: i64) -> Entry {
    Entry::Transform(TransformOperation::NumericIncrement(NumericOperand::from(value)))
}

pub fn increment_double(value: f64) -> Entry {
    Entry::Transform(TransformOperation::NumericIncrement(NumericOperand::from(value)))
}

pub fn array_union(values: &[i64]) -> Entry {
    Entry::Transform(TransformOperation::array_union(integers(values)))
}

pub fn array_remove(values: &[i64]) -> Entry {
    Entry::Transform(TransformOperation::array_remove(integers(values)))
}

pub fn integers(values: &[i64]) -> Vec<FirestoreValue> {
    values.iter().copied().map(FirestoreValue::from_integer).collect()
}

pub fn key(path: &str) -> DocumentKey {
    DocumentKey::from_string(path).expect("valid document key")
}

pub fn field(path: &str) -> FieldPath {
    FieldPath::from_dot_separated(path).expect("valid field path")
}

pub fn version(seconds: i64) -> SnapshotVersion {
    SnapshotVersion::new(Timestamp::new(seconds, 0))
}

/// Builds an object from dot-separated paths. Only plain values are kept.
pub fn object(entries: &[(&str, Entry)]) -> ObjectValue {
    entries
        .iter()
        .fold(ObjectValue::builder(), |builder, (path, entry)| match entry {
            Entry::Value(value) => builder.set(&field(path), value.clone()),
            _ => builder,
        })
        .build()
}

fn transforms(entries: &[(&str, Entry)]) -> Vec<FieldTransform> {
    entries
        .iter()
        .filter_map(|(path, entry)| match entry {
            Entry::Transform(operation) => Some(FieldTransform::new(field(path), operation.clone())),
            _ => None,
        })
        .collect()
}

pub fn doc(path: &str, seconds: i64, entries: &[(&str, Entry)]) -> MutableDocument {
    MutableDocument::new_found_document(key(path), version(seconds), object(entries))
}

pub fn deleted_doc(path: &str, seconds: i64) -> MutableDocument {
    MutableDocument::new_no_document(key(path), version(seconds))
}

pub fn unknown_doc(path: &str, seconds: i64) -> MutableDocument {
    MutableDocument::new_unknown_document(key(path), version(seconds))
}

pub fn set_mutation(path: &str, entries: &[(&str, Entry)]) -> Mutation {
    Mutation::set(key(path), object(entries)).with_field_transforms(transforms(entries))
}

/// An update: the mask holds every written or deleted path, transforms are
/// carried separately.
pub fn patch_mutation(path: &str, entries: &[(&str, Entry)]) -> Mutation {
    let mask = entries
        .iter()
        .filter(|(_, entry)| !matches!(entry, Entry::Transform(_)))
        .map(|(path, _)| field(path))
        .collect::<FieldMask>();
    Mutation::patch(key(path), object(entries), mask).with_field_transforms(transforms(entries))
}

/// A set with merge over the given field paths.
pub fn merge_mutation(path: &str, entries: &[(&str, Entry)], merge_fields: &[&str]) -> Mutation {
    let mask = merge_fields.iter().map(|path| field(path)).collect::<FieldMask>();
    Mutation::merge(key(path), object(entries), mask).with_field_transforms(transforms(entries))
}

pub fn delete_mutation(path: &str) -> Mutation {
    Mutation::delete(key(path))
}

pub fn field_index(collection_group: &str, segments: &[(&str, SegmentKind)]) -> FieldIndex {
    segments
        .iter()
        .fold(FieldIndex::for_collection_group(collection_group), |index, (path, kind)| {
            index.with_segment(field(path), *kind)
        })
}

pub fn query(path: &str) -> Query {
    Query::collection(path).expect("valid collection path")
}

pub fn filter(query: Query, path: &str, op: &str, value: FirestoreValue) -> Query {
    let operator = FilterOperator::parse(op).expect("known operator");
    query.where_field(field(path), operator, value).expect("valid filter")
}

pub fn order_by(query: Query, path: &str, direction: &str) -> Query {
    let direction = match direction {
        "desc" => OrderDirection::Descending,
        _ => OrderDirection::Ascending,
    };
    query.order_by_field(field(path), direction).expect("valid order by")
}
