use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::model::{DatabaseId, DocumentKey, GeoPoint, Timestamp};
use crate::value::{ArrayValue, BytesValue, MapValue, ReferenceValue, ServerTimestampValue};

/// A single Firestore field value.
///
/// Equality is strict: `Integer(1)` and `Double(1.0)` are different values even
/// though they sort as equal, doubles compare by bit pattern (so `-0.0 != 0.0`
/// and `NaN == NaN`), and map field order is irrelevant. Use
/// [`crate::value::values::compare`] for the canonical ordering.
#[derive(Clone, Debug)]
pub struct FirestoreValue {
    kind: ValueKind,
}

#[derive(Clone, Debug)]
pub enum ValueKind {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    Timestamp(Timestamp),
    /// Local placeholder for a server timestamp that is not yet acknowledged.
    ServerTimestamp(ServerTimestampValue),
    String(String),
    Bytes(BytesValue),
    Reference(ReferenceValue),
    GeoPoint(GeoPoint),
    Array(ArrayValue),
    Map(MapValue),
}

impl FirestoreValue {
    pub fn from_kind(kind: ValueKind) -> Self {
        Self { kind }
    }

    pub fn null() -> Self {
        Self::from_kind(ValueKind::Null)
    }

    pub fn from_bool(value: bool) -> Self {
        Self::from_kind(ValueKind::Boolean(value))
    }

    pub fn from_integer(value: i64) -> Self {
        Self::from_kind(ValueKind::Integer(value))
    }

    pub fn from_double(value: f64) -> Self {
        Self::from_kind(ValueKind::Double(value))
    }

    pub fn from_timestamp(value: Timestamp) -> Self {
        Self::from_kind(ValueKind::Timestamp(value))
    }

    pub fn from_string(value: impl Into<String>) -> Self {
        Self::from_kind(ValueKind::String(value.into()))
    }

    pub fn from_bytes(value: BytesValue) -> Self {
        Self::from_kind(ValueKind::Bytes(value))
    }

    pub fn from_reference(database_id: DatabaseId, key: DocumentKey) -> Self {
        Self::from_kind(ValueKind::Reference(ReferenceValue::new(database_id, key)))
    }

    pub fn from_geo_point(value: GeoPoint) -> Self {
        Self::from_kind(ValueKind::GeoPoint(value))
    }

    pub fn from_array(values: Vec<FirestoreValue>) -> Self {
        Self::from_kind(ValueKind::Array(ArrayValue::new(values)))
    }

    pub fn from_map(map: BTreeMap<String, FirestoreValue>) -> Self {
        Self::from_kind(ValueKind::Map(MapValue::new(map)))
    }

    pub fn empty_map() -> Self {
        Self::from_map(BTreeMap::new())
    }

    /// Pending server timestamp written at `local_write_time`.
    ///
    /// A pending timestamp never stores another pending timestamp as its
    /// previous value; the original previous value is carried forward instead.
    pub fn server_timestamp(local_write_time: Timestamp, previous: Option<&FirestoreValue>) -> Self {
        Self::from_kind(ValueKind::ServerTimestamp(ServerTimestampValue::new(
            local_write_time,
            previous,
        )))
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn into_kind(self) -> ValueKind {
        self.kind
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, ValueKind::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, ValueKind::Integer(_) | ValueKind::Double(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.kind, ValueKind::Integer(_))
    }

    pub fn is_double(&self) -> bool {
        matches!(self.kind, ValueKind::Double(_))
    }

    pub fn is_nan(&self) -> bool {
        matches!(self.kind, ValueKind::Double(value) if value.is_nan())
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, ValueKind::Map(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, ValueKind::Array(_))
    }

    pub fn is_server_timestamp(&self) -> bool {
        matches!(self.kind, ValueKind::ServerTimestamp(_))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.kind {
            ValueKind::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match &self.kind {
            ValueKind::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut MapValue> {
        match &mut self.kind {
            ValueKind::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match &self.kind {
            ValueKind::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl PartialEq for FirestoreValue {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Boolean(l), ValueKind::Boolean(r)) => l == r,
            (ValueKind::Integer(l), ValueKind::Integer(r)) => l == r,
            (ValueKind::Double(l), ValueKind::Double(r)) => l.to_bits() == r.to_bits(),
            (ValueKind::Timestamp(l), ValueKind::Timestamp(r)) => l == r,
            (ValueKind::ServerTimestamp(l), ValueKind::ServerTimestamp(r)) => l == r,
            (ValueKind::String(l), ValueKind::String(r)) => l == r,
            (ValueKind::Bytes(l), ValueKind::Bytes(r)) => l == r,
            (ValueKind::Reference(l), ValueKind::Reference(r)) => l == r,
            (ValueKind::GeoPoint(l), ValueKind::GeoPoint(r)) => {
                l.latitude().to_bits() == r.latitude().to_bits()
                    && l.longitude().to_bits() == r.longitude().to_bits()
            }
            (ValueKind::Array(l), ValueKind::Array(r)) => l == r,
            (ValueKind::Map(l), ValueKind::Map(r)) => l == r,
            _ => false,
        }
    }
}

impl Eq for FirestoreValue {}

impl Hash for FirestoreValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(&self.kind).hash(state);
        match &self.kind {
            ValueKind::Null => {}
            ValueKind::Boolean(value) => value.hash(state),
            ValueKind::Integer(value) => value.hash(state),
            ValueKind::Double(value) => value.to_bits().hash(state),
            ValueKind::Timestamp(value) => value.hash(state),
            ValueKind::ServerTimestamp(value) => value.hash(state),
            ValueKind::String(value) => value.hash(state),
            ValueKind::Bytes(value) => value.hash(state),
            ValueKind::Reference(value) => value.hash(state),
            ValueKind::GeoPoint(value) => {
                value.latitude().to_bits().hash(state);
                value.longitude().to_bits().hash(state);
            }
            ValueKind::Array(value) => value.hash(state),
            ValueKind::Map(value) => value.hash(state),
        }
    }
}
