use std::collections::HashSet;

use crate::core::{Bound, FieldFilter, FilterOperator, OrderBy, OrderDirection, Target};
use crate::error::{invalid_argument, FirestoreResult};
use crate::model::{FieldPath, IntoFieldPath, MutableDocument, ResourcePath};
use crate::value::FirestoreValue;

/// A query as written by the caller, before order-by normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    path: ResourcePath,
    collection_group: Option<String>,
    filters: Vec<FieldFilter>,
    explicit_order_bys: Vec<OrderBy>,
    limit: Option<i64>,
    start_at: Option<Bound>,
    end_at: Option<Bound>,
}

impl Query {
    pub fn new(path: ResourcePath) -> Self {
        Self {
            path,
            collection_group: None,
            filters: Vec::new(),
            explicit_order_bys: Vec::new(),
            limit: None,
            start_at: None,
            end_at: None,
        }
    }

    /// Query over the collection at `path` (or the single document when the
    /// path has an even number of segments).
    pub fn collection(path: &str) -> FirestoreResult<Self> {
        Ok(Self::new(ResourcePath::from_string(path)?))
    }

    /// Query over every collection with the given id.
    pub fn collection_group(collection_id: impl Into<String>) -> Self {
        let mut query = Self::new(ResourcePath::root());
        query.collection_group = Some(collection_id.into());
        query
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    pub fn explicit_order_bys(&self) -> &[OrderBy] {
        &self.explicit_order_bys
    }

    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn where_field(
        self,
        field: impl IntoFieldPath,
        operator: FilterOperator,
        value: FirestoreValue,
    ) -> FirestoreResult<Self> {
        let filter = FieldFilter::new(field.into_field_path()?, operator, value)?;
        Ok(self.filter(filter))
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.explicit_order_bys.push(order_by);
        self
    }

    pub fn order_by_field(
        self,
        field: impl IntoFieldPath,
        direction: OrderDirection,
    ) -> FirestoreResult<Self> {
        Ok(self.order_by(OrderBy::new(field.into_field_path()?, direction)))
    }

    pub fn limit(mut self, limit: i64) -> FirestoreResult<Self> {
        if limit <= 0 {
            return Err(invalid_argument(format!(
                "Invalid Query. Query limit ({limit}) is invalid. Limit must be positive."
            )));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    pub fn start_at(mut self, bound: Bound) -> Self {
        self.start_at = Some(bound);
        self
    }

    pub fn end_at(mut self, bound: Bound) -> Self {
        self.end_at = Some(bound);
        self
    }

    /// Explicit order-bys, then unordered inequality fields in field-path
    /// order, then the document key. Implicit clauses take the direction of
    /// the last explicit clause.
    pub fn normalized_order_bys(&self) -> Vec<OrderBy> {
        let mut result = self.explicit_order_bys.clone();
        let mut ordered: HashSet<FieldPath> = result
            .iter()
            .map(|order_by| order_by.field().clone())
            .collect();

        let last_direction = self
            .explicit_order_bys
            .last()
            .map(OrderBy::direction)
            .unwrap_or(OrderDirection::Ascending);

        let mut inequality_fields: Vec<FieldPath> = self
            .filters
            .iter()
            .filter(|filter| filter.is_inequality())
            .map(|filter| filter.field().clone())
            .collect();
        inequality_fields.sort();
        inequality_fields.dedup();

        for field in inequality_fields {
            if !field.is_key_field() && ordered.insert(field.clone()) {
                result.push(OrderBy::new(field, last_direction));
            }
        }

        if !ordered.contains(&FieldPath::key_path()) {
            result.push(OrderBy::new(FieldPath::key_path(), last_direction));
        }
        result
    }

    pub fn to_target(&self) -> Target {
        Target::new(
            self.path.clone(),
            self.collection_group.clone(),
            self.filters.clone(),
            self.normalized_order_bys(),
            self.limit,
            self.start_at.clone(),
            self.end_at.clone(),
        )
    }

    /// Whether the document would be part of this query's result set,
    /// ignoring the limit.
    pub fn matches(&self, document: &MutableDocument) -> bool {
        let target = self.to_target();
        target_matches(&target, document)
    }
}

pub(crate) fn target_matches(target: &Target, document: &MutableDocument) -> bool {
    if !document.is_found_document() || !target.matches_path(document) {
        return false;
    }

    let has_order_by_fields = target
        .order_bys()
        .iter()
        .filter(|order_by| !order_by.field().is_key_field())
        .all(|order_by| document.field(order_by.field()).is_some());
    if !has_order_by_fields {
        return false;
    }

    if !target.filters().iter().all(|filter| filter.matches(document)) {
        return false;
    }

    if let Some(bound) = target.start_at() {
        if bound.is_before_start(target.order_bys(), document) {
            return false;
        }
    }
    if let Some(bound) = target.end_at() {
        if bound.is_after_end(target.order_bys(), document) {
            return false;
        }
    }
    true
}
