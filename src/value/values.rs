//! Canonical ordering and canonical ids for [`FirestoreValue`].

use std::cmp::Ordering;

use crate::util::{compare_doubles, compare_mixed, compare_utf16};
use crate::value::{FirestoreValue, MapValue, ValueKind};

pub const TYPE_ORDER_NULL: u8 = 0;
pub const TYPE_ORDER_BOOLEAN: u8 = 1;
pub const TYPE_ORDER_NUMBER: u8 = 2;
pub const TYPE_ORDER_TIMESTAMP: u8 = 3;
pub const TYPE_ORDER_SERVER_TIMESTAMP: u8 = 4;
pub const TYPE_ORDER_STRING: u8 = 5;
pub const TYPE_ORDER_BLOB: u8 = 6;
pub const TYPE_ORDER_REFERENCE: u8 = 7;
pub const TYPE_ORDER_GEOPOINT: u8 = 8;
pub const TYPE_ORDER_ARRAY: u8 = 9;
pub const TYPE_ORDER_MAP: u8 = 10;

/// Rank of the value's type in the cross-type ordering.
pub fn type_order(value: &FirestoreValue) -> u8 {
    match value.kind() {
        ValueKind::Null => TYPE_ORDER_NULL,
        ValueKind::Boolean(_) => TYPE_ORDER_BOOLEAN,
        ValueKind::Integer(_) | ValueKind::Double(_) => TYPE_ORDER_NUMBER,
        ValueKind::Timestamp(_) => TYPE_ORDER_TIMESTAMP,
        ValueKind::ServerTimestamp(_) => TYPE_ORDER_SERVER_TIMESTAMP,
        ValueKind::String(_) => TYPE_ORDER_STRING,
        ValueKind::Bytes(_) => TYPE_ORDER_BLOB,
        ValueKind::Reference(_) => TYPE_ORDER_REFERENCE,
        ValueKind::GeoPoint(_) => TYPE_ORDER_GEOPOINT,
        ValueKind::Array(_) => TYPE_ORDER_ARRAY,
        ValueKind::Map(_) => TYPE_ORDER_MAP,
    }
}

/// Total order over all values. Numbers compare by magnitude across the
/// integer/double split, so `compare` may report `Equal` for values that are
/// not `==`.
pub fn compare(left: &FirestoreValue, right: &FirestoreValue) -> Ordering {
    let left_type = type_order(left);
    let right_type = type_order(right);
    if left_type != right_type {
        return left_type.cmp(&right_type);
    }

    match (left.kind(), right.kind()) {
        (ValueKind::Null, ValueKind::Null) => Ordering::Equal,
        (ValueKind::Boolean(l), ValueKind::Boolean(r)) => l.cmp(r),
        (ValueKind::Integer(l), ValueKind::Integer(r)) => l.cmp(r),
        (ValueKind::Double(l), ValueKind::Double(r)) => compare_doubles(*l, *r),
        (ValueKind::Double(l), ValueKind::Integer(r)) => compare_mixed(*l, *r),
        (ValueKind::Integer(l), ValueKind::Double(r)) => compare_mixed(*r, *l).reverse(),
        (ValueKind::Timestamp(l), ValueKind::Timestamp(r)) => l.cmp(r),
        (ValueKind::ServerTimestamp(l), ValueKind::ServerTimestamp(r)) => {
            l.local_write_time().cmp(&r.local_write_time())
        }
        (ValueKind::String(l), ValueKind::String(r)) => compare_utf16(l, r),
        (ValueKind::Bytes(l), ValueKind::Bytes(r)) => l.cmp(r),
        (ValueKind::Reference(l), ValueKind::Reference(r)) => l.compare(r),
        (ValueKind::GeoPoint(l), ValueKind::GeoPoint(r)) => l.compare(r),
        (ValueKind::Array(l), ValueKind::Array(r)) => {
            compare_sequences(l.values().iter(), r.values().iter())
        }
        (ValueKind::Map(l), ValueKind::Map(r)) => compare_maps(l, r),
        _ => Ordering::Equal,
    }
}

fn compare_sequences<'a, I>(left: I, right: I) -> Ordering
where
    I: ExactSizeIterator<Item = &'a FirestoreValue>,
{
    let left_len = left.len();
    let right_len = right.len();
    for (l, r) in left.zip(right) {
        match compare(l, r) {
            Ordering::Equal => continue,
            non_eq => return non_eq,
        }
    }
    left_len.cmp(&right_len)
}

/// Map entries sorted by UTF-16 key order.
pub(crate) fn sorted_entries(map: &MapValue) -> Vec<(&String, &FirestoreValue)> {
    let mut entries: Vec<_> = map.fields().iter().collect();
    entries.sort_by(|(l, _), (r, _)| compare_utf16(l, r));
    entries
}

fn compare_maps(left: &MapValue, right: &MapValue) -> Ordering {
    let left_entries = sorted_entries(left);
    let right_entries = sorted_entries(right);
    for ((l_key, l_value), (r_key, r_value)) in left_entries.iter().zip(right_entries.iter()) {
        let ordering = compare_utf16(l_key, r_key).then_with(|| compare(l_value, r_value));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left_entries.len().cmp(&right_entries.len())
}

/// Deterministic string form of a value, stable across equal values.
pub fn canonical_id(value: &FirestoreValue) -> String {
    let mut out = String::new();
    write_canonical_id(value, &mut out);
    out
}

fn write_canonical_id(value: &FirestoreValue, out: &mut String) {
    match value.kind() {
        ValueKind::Null => out.push_str("null"),
        ValueKind::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
        ValueKind::Integer(value) => out.push_str(&value.to_string()),
        // Debug keeps the fractional marker so `1.0` never collides with `1`.
        ValueKind::Double(value) => out.push_str(&format!("{value:?}")),
        ValueKind::Timestamp(value) => {
            out.push_str(&format!("time({},{})", value.seconds, value.nanos))
        }
        ValueKind::ServerTimestamp(value) => {
            let time = value.local_write_time();
            out.push_str(&format!("serverTimestamp({},{})", time.seconds, time.nanos))
        }
        ValueKind::String(value) => out.push_str(value),
        ValueKind::Bytes(value) => out.push_str(&value.to_base64()),
        ValueKind::Reference(value) => out.push_str(&value.key().path().canonical_string()),
        ValueKind::GeoPoint(value) => out.push_str(&format!(
            "geo({:?},{:?})",
            value.latitude(),
            value.longitude()
        )),
        ValueKind::Array(array) => {
            out.push('[');
            for (index, element) in array.values().iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical_id(element, out);
            }
            out.push(']');
        }
        ValueKind::Map(map) => {
            out.push('{');
            for (index, (key, element)) in sorted_entries(map).into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                write_canonical_id(element, out);
            }
            out.push('}');
        }
    }
}
