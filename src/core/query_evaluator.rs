use std::cmp::Ordering;

use crate::core::query::target_matches;
use crate::core::{OrderBy, Target};
use crate::model::MutableDocument;

/// Full-scan execution of a target over candidate documents: filters, sorts
/// by the normalized order-bys, applies cursors and the limit.
///
/// Used when no index serves the target, for example when it constrains more
/// than one field with inequalities.
pub fn apply_target_to_documents(
    documents: Vec<MutableDocument>,
    target: &Target,
) -> Vec<MutableDocument> {
    let mut results: Vec<MutableDocument> = documents
        .into_iter()
        .filter(|document| target_matches(target, document))
        .collect();

    results.sort_by(|left, right| compare_documents(left, right, target.order_bys()));

    if let Some(limit) = target.limit() {
        results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }

    results
}

/// Orders two documents by a list of order-by clauses.
pub fn compare_documents(
    left: &MutableDocument,
    right: &MutableDocument,
    order_bys: &[OrderBy],
) -> Ordering {
    for order_by in order_bys {
        match order_by.compare(left, right) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::core::{Bound, FilterOperator, OrderDirection, Query};
    use crate::model::{DocumentKey, ObjectValue, SnapshotVersion};
    use crate::value::FirestoreValue;

    fn city(id: &str, population: i64) -> MutableDocument {
        let mut map = BTreeMap::new();
        map.insert("population".to_string(), FirestoreValue::from_integer(population));
        MutableDocument::new_found_document(
            DocumentKey::from_string(&format!("cities/{id}")).unwrap(),
            SnapshotVersion::none(),
            ObjectValue::from_map(map),
        )
    }

    fn ids(documents: &[MutableDocument]) -> Vec<&str> {
        documents.iter().map(|document| document.key().id()).collect()
    }

    #[test]
    fn applies_limit_and_ordering() {
        let query = Query::collection("cities")
            .unwrap()
            .order_by_field("population", OrderDirection::Ascending)
            .unwrap()
            .limit(2)
            .unwrap();

        let docs = vec![city("sf", 100), city("nyc", 50), city("la", 75)];

        let result = apply_target_to_documents(docs, &query.to_target());
        assert_eq!(ids(&result), vec!["nyc", "la"]);
    }

    #[test]
    fn serves_multiple_inequalities_in_memory() {
        let query = Query::collection("cities")
            .unwrap()
            .where_field("population", FilterOperator::GreaterThan, FirestoreValue::from_integer(60))
            .unwrap()
            .where_field("population", FilterOperator::LessThan, FirestoreValue::from_integer(200))
            .unwrap()
            .order_by_field("population", OrderDirection::Descending)
            .unwrap();

        let docs = vec![
            city("sf", 100),
            city("nyc", 50),
            city("la", 75),
            MutableDocument::new_no_document(
                DocumentKey::from_string("cities/gone").unwrap(),
                SnapshotVersion::none(),
            ),
        ];

        let result = apply_target_to_documents(docs, &query.to_target());
        assert_eq!(ids(&result), vec!["sf", "la"]);
    }

    #[test]
    fn applies_cursors() {
        let query = Query::collection("cities")
            .unwrap()
            .order_by_field("population", OrderDirection::Ascending)
            .unwrap()
            .start_at(Bound::new(vec![FirestoreValue::from_integer(75)], true))
            .end_at(Bound::new(vec![FirestoreValue::from_integer(100)], false));

        let docs = vec![city("sf", 100), city("nyc", 50), city("la", 75)];

        let result = apply_target_to_documents(docs, &query.to_target());
        assert_eq!(ids(&result), vec!["la"]);
    }

    #[test]
    fn skips_documents_from_other_collections() {
        let other = MutableDocument::new_found_document(
            DocumentKey::from_string("towns/x").unwrap(),
            SnapshotVersion::none(),
            city("x", 10).data().clone(),
        );
        let query = Query::collection("cities").unwrap();
        let result = apply_target_to_documents(vec![other, city("a", 1)], &query.to_target());
        assert_eq!(ids(&result), vec!["a"]);
    }
}
