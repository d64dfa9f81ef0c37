use std::cmp::Ordering;

use crate::core::filter::field_value;
use crate::core::{OrderBy, OrderDirection};
use crate::model::MutableDocument;
use crate::value::{values, FirestoreValue};

/// A cursor position: one value per order-by clause, compared in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bound {
    position: Vec<FirestoreValue>,
    inclusive: bool,
}

impl Bound {
    pub fn new(position: Vec<FirestoreValue>, inclusive: bool) -> Self {
        Self {
            position,
            inclusive,
        }
    }

    pub fn position(&self) -> &[FirestoreValue] {
        &self.position
    }

    pub fn inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn canonical_id(&self) -> String {
        let values: Vec<String> = self.position.iter().map(values::canonical_id).collect();
        format!(
            "{}{}",
            if self.inclusive { "b:" } else { "a:" },
            values.join(",")
        )
    }

    /// Compares the document with the cursor position over the leading
    /// order-by clauses the bound provides values for.
    pub(crate) fn compare_to_document(&self, order_bys: &[OrderBy], document: &MutableDocument) -> Ordering {
        for (order_by, bound_value) in order_bys.iter().zip(self.position.iter()) {
            let document_value = field_value(document, order_by.field(), bound_value)
                .unwrap_or_else(FirestoreValue::null);
            let mut ordering = values::compare(&document_value, bound_value);
            if order_by.direction() == OrderDirection::Descending {
                ordering = ordering.reverse();
            }
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Whether a start-at bound excludes the document.
    pub(crate) fn is_before_start(&self, order_bys: &[OrderBy], document: &MutableDocument) -> bool {
        let ordering = self.compare_to_document(order_bys, document);
        if self.inclusive {
            ordering == Ordering::Less
        } else {
            ordering != Ordering::Greater
        }
    }

    /// Whether an end-at bound excludes the document.
    pub(crate) fn is_after_end(&self, order_bys: &[OrderBy], document: &MutableDocument) -> bool {
        let ordering = self.compare_to_document(order_bys, document);
        if self.inclusive {
            ordering == Ordering::Greater
        } else {
            ordering != Ordering::Less
        }
    }
}
