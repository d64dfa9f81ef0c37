use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::{invalid_argument, FirestoreResult};
use crate::model::{DatabaseId, FieldPath, MutableDocument};
use crate::value::{values, ArrayValue, FirestoreValue, ValueKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    ArrayContains,
    ArrayContainsAny,
    In,
    NotIn,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::LessThan => "<",
            FilterOperator::LessThanOrEqual => "<=",
            FilterOperator::Equal => "==",
            FilterOperator::NotEqual => "!=",
            FilterOperator::GreaterThan => ">",
            FilterOperator::GreaterThanOrEqual => ">=",
            FilterOperator::ArrayContains => "array-contains",
            FilterOperator::ArrayContainsAny => "array-contains-any",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not-in",
        }
    }

    pub fn parse(operator: &str) -> FirestoreResult<Self> {
        let parsed = match operator {
            "<" => FilterOperator::LessThan,
            "<=" => FilterOperator::LessThanOrEqual,
            "==" => FilterOperator::Equal,
            "!=" => FilterOperator::NotEqual,
            ">" => FilterOperator::GreaterThan,
            ">=" => FilterOperator::GreaterThanOrEqual,
            "array-contains" => FilterOperator::ArrayContains,
            "array-contains-any" => FilterOperator::ArrayContainsAny,
            "in" => FilterOperator::In,
            "not-in" => FilterOperator::NotIn,
            other => {
                return Err(invalid_argument(format!(
                    "Invalid query. Unknown filter operator '{other}'"
                )))
            }
        };
        Ok(parsed)
    }

    /// Range and exclusion operators. An index serves them with an ordered
    /// segment whose direction matches the query's order.
    pub fn is_inequality(&self) -> bool {
        matches!(
            self,
            FilterOperator::LessThan
                | FilterOperator::LessThanOrEqual
                | FilterOperator::GreaterThan
                | FilterOperator::GreaterThanOrEqual
                | FilterOperator::NotEqual
                | FilterOperator::NotIn
        )
    }

    pub fn is_array_operator(&self) -> bool {
        matches!(
            self,
            FilterOperator::ArrayContains | FilterOperator::ArrayContainsAny
        )
    }

    fn requires_array_value(&self) -> bool {
        matches!(
            self,
            FilterOperator::ArrayContainsAny | FilterOperator::In | FilterOperator::NotIn
        )
    }

    fn matches_comparison(&self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::LessThan => ordering == Ordering::Less,
            FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
            FilterOperator::Equal => ordering == Ordering::Equal,
            FilterOperator::NotEqual => ordering != Ordering::Equal,
            FilterOperator::GreaterThan => ordering == Ordering::Greater,
            FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            _ => false,
        }
    }
}

impl Display for FilterOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field <op> value` constraint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldFilter {
    field: FieldPath,
    operator: FilterOperator,
    value: FirestoreValue,
}

impl FieldFilter {
    pub fn new(field: FieldPath, operator: FilterOperator, value: FirestoreValue) -> FirestoreResult<Self> {
        if operator.requires_array_value() && !value.is_array() {
            return Err(invalid_argument(format!(
                "Invalid Query. A non-empty array is required for '{operator}' filters."
            )));
        }
        Ok(Self {
            field,
            operator,
            value,
        })
    }

    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    pub fn operator(&self) -> FilterOperator {
        self.operator
    }

    pub fn value(&self) -> &FirestoreValue {
        &self.value
    }

    pub fn is_inequality(&self) -> bool {
        self.operator.is_inequality()
    }

    pub fn is_array_operator(&self) -> bool {
        self.operator.is_array_operator()
    }

    pub fn canonical_id(&self) -> String {
        format!(
            "{}{}{}",
            self.field.canonical_string(),
            self.operator,
            values::canonical_id(&self.value)
        )
    }

    pub fn matches(&self, document: &MutableDocument) -> bool {
        let Some(other) = field_value(document, &self.field, &self.value) else {
            return false;
        };

        match self.operator {
            FilterOperator::ArrayContains => other
                .as_array()
                .is_some_and(|array| array.contains(&self.value)),
            FilterOperator::ArrayContainsAny => match (other.as_array(), self.value.as_array()) {
                (Some(array), Some(needles)) => {
                    needles.values().iter().any(|needle| array.contains(needle))
                }
                _ => false,
            },
            FilterOperator::In => self
                .value
                .as_array()
                .is_some_and(|candidates| candidates.contains(&other)),
            FilterOperator::NotIn => self.value.as_array().is_some_and(|candidates| {
                !candidates.contains(&FirestoreValue::null())
                    && !other.is_null()
                    && !candidates.contains(&other)
            }),
            // Types do not have to match for `!=`.
            FilterOperator::NotEqual => {
                !other.is_null()
                    && self
                        .operator
                        .matches_comparison(values::compare(&other, &self.value))
            }
            _ => {
                values::type_order(&other) == values::type_order(&self.value)
                    && self
                        .operator
                        .matches_comparison(values::compare(&other, &self.value))
            }
        }
    }
}

impl Display for FieldFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

/// The value `document` holds at `field`. The key field resolves to a
/// reference in the same database as `like`, so it compares by path.
pub(crate) fn field_value(
    document: &MutableDocument,
    field: &FieldPath,
    like: &FirestoreValue,
) -> Option<FirestoreValue> {
    if field.is_key_field() {
        let database_id = reference_database(like).unwrap_or_else(|| DatabaseId::default(""));
        return Some(FirestoreValue::from_reference(
            database_id,
            document.key().clone(),
        ));
    }
    document.field(field).cloned()
}

fn reference_database(value: &FirestoreValue) -> Option<DatabaseId> {
    match value.kind() {
        ValueKind::Reference(reference) => Some(reference.database_id().clone()),
        ValueKind::Array(array) => first_reference_database(array),
        _ => None,
    }
}

fn first_reference_database(array: &ArrayValue) -> Option<DatabaseId> {
    array.values().iter().find_map(reference_database)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::{DocumentKey, ObjectValue, SnapshotVersion};

    fn doc(fields: &[(&str, FirestoreValue)]) -> MutableDocument {
        let data: BTreeMap<String, FirestoreValue> = fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        MutableDocument::new_found_document(
            DocumentKey::from_string("coll/doc").unwrap(),
            SnapshotVersion::none(),
            ObjectValue::from_map(data),
        )
    }

    fn filter(field: &str, op: &str, value: FirestoreValue) -> FieldFilter {
        FieldFilter::new(
            FieldPath::from_dot_separated(field).unwrap(),
            FilterOperator::parse(op).unwrap(),
            value,
        )
        .unwrap()
    }

    fn int(value: i64) -> FirestoreValue {
        FirestoreValue::from_integer(value)
    }

    #[test]
    fn classifies_operators() {
        assert!(FilterOperator::NotIn.is_inequality());
        assert!(FilterOperator::NotEqual.is_inequality());
        assert!(!FilterOperator::In.is_inequality());
        assert!(FilterOperator::ArrayContainsAny.is_array_operator());
        assert!(FilterOperator::parse("like").is_err());
    }

    #[test]
    fn rejects_non_array_value_for_in() {
        let err = FieldFilter::new(FieldPath::from_single_segment("a"), FilterOperator::In, int(1))
            .unwrap_err();
        assert_eq!(err.code_str(), "firestore/invalid-argument");
    }

    #[test]
    fn comparison_filters_use_canonical_order() {
        let document = doc(&[("a", int(1))]);
        assert!(filter("a", "==", FirestoreValue::from_double(1.0)).matches(&document));
        assert!(filter("a", ">", FirestoreValue::from_double(0.5)).matches(&document));
        assert!(!filter("a", "<", FirestoreValue::from_string("x")).matches(&document));
        assert!(filter("a", "!=", FirestoreValue::from_string("x")).matches(&document));
        assert!(!filter("b", "!=", int(1)).matches(&document));
    }

    #[test]
    fn array_and_membership_filters() {
        let document = doc(&[
            ("tags", FirestoreValue::from_array(vec![int(1), int(2)])),
            ("a", int(3)),
        ]);
        assert!(filter("tags", "array-contains", int(2)).matches(&document));
        assert!(filter("tags", "array-contains-any", FirestoreValue::from_array(vec![int(5), int(1)]))
            .matches(&document));
        assert!(filter("a", "in", FirestoreValue::from_array(vec![int(3)])).matches(&document));
        assert!(filter("a", "not-in", FirestoreValue::from_array(vec![int(4)])).matches(&document));
        assert!(!filter("a", "not-in", FirestoreValue::from_array(vec![FirestoreValue::null()]))
            .matches(&document));
    }

    #[test]
    fn key_field_compares_paths() {
        let document = doc(&[]);
        let reference = |path: &str| {
            FirestoreValue::from_reference(
                DatabaseId::default("p"),
                DocumentKey::from_string(path).unwrap(),
            )
        };
        assert!(filter("__name__", "==", reference("coll/doc")).matches(&document));
        assert!(filter("__name__", ">", reference("coll/a")).matches(&document));
        assert!(!filter("__name__", ">", reference("coll/z")).matches(&document));
    }
}
