use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter};

use crate::core::{Bound, FieldFilter, OrderBy};
use crate::model::{DocumentKey, FieldPath, MutableDocument, ResourcePath};

/// A normalized query: the form used for index planning and local execution.
///
/// Order-bys are complete: explicit clauses first, then every inequality field
/// that is not already ordered, then the document key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    path: ResourcePath,
    collection_group: Option<String>,
    filters: Vec<FieldFilter>,
    order_bys: Vec<OrderBy>,
    limit: Option<i64>,
    start_at: Option<Bound>,
    end_at: Option<Bound>,
}

impl Target {
    pub(crate) fn new(
        path: ResourcePath,
        collection_group: Option<String>,
        filters: Vec<FieldFilter>,
        order_bys: Vec<OrderBy>,
        limit: Option<i64>,
        start_at: Option<Bound>,
        end_at: Option<Bound>,
    ) -> Self {
        Self {
            path,
            collection_group,
            filters,
            order_bys,
            limit,
            start_at,
            end_at,
        }
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn collection_group(&self) -> Option<&str> {
        self.collection_group.as_deref()
    }

    /// The collection group an index must belong to in order to serve this
    /// target.
    pub fn collection_group_id(&self) -> &str {
        match &self.collection_group {
            Some(group) => group,
            None => self.path.last_segment().unwrap_or_default(),
        }
    }

    pub fn filters(&self) -> &[FieldFilter] {
        &self.filters
    }

    pub fn order_bys(&self) -> &[OrderBy] {
        &self.order_bys
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    pub fn start_at(&self) -> Option<&Bound> {
        self.start_at.as_ref()
    }

    pub fn end_at(&self) -> Option<&Bound> {
        self.end_at.as_ref()
    }

    pub fn is_document_query(&self) -> bool {
        DocumentKey::is_document_key(&self.path)
            && self.collection_group.is_none()
            && self.filters.is_empty()
    }

    /// Distinct fields constrained by an inequality filter.
    pub fn inequality_filter_fields(&self) -> BTreeSet<FieldPath> {
        self.filters
            .iter()
            .filter(|filter| filter.is_inequality())
            .map(|filter| filter.field().clone())
            .collect()
    }

    /// Number of index segments a fully matching index needs, excluding the
    /// document key.
    pub fn segment_count(&self) -> usize {
        let mut fields = HashSet::new();
        let mut has_array_segment = false;
        for filter in &self.filters {
            if filter.field().is_key_field() {
                continue;
            }
            if filter.is_array_operator() {
                has_array_segment = true;
            } else {
                fields.insert(filter.field().clone());
            }
        }
        for order_by in &self.order_bys {
            if !order_by.field().is_key_field() {
                fields.insert(order_by.field().clone());
            }
        }
        fields.len() + usize::from(has_array_segment)
    }

    /// Whether the document lives under this target's path or collection group.
    pub fn matches_path(&self, document: &MutableDocument) -> bool {
        self.matches_key(document.key())
    }

    pub fn matches_key(&self, key: &DocumentKey) -> bool {
        let document_path = key.path();
        match &self.collection_group {
            Some(group) => key.has_collection_id(group) && self.path.is_prefix_of(document_path),
            None if DocumentKey::is_document_key(&self.path) => &self.path == document_path,
            None => self.path.is_immediate_parent_of(document_path),
        }
    }

    pub fn canonical_id(&self) -> String {
        let mut id = self.path.canonical_string();
        if let Some(group) = &self.collection_group {
            id.push_str("|cg:");
            id.push_str(group);
        }
        id.push_str("|f:");
        for filter in &self.filters {
            id.push_str(&filter.canonical_id());
        }
        id.push_str("|ob:");
        for order_by in &self.order_bys {
            id.push_str(&order_by.canonical_id());
        }
        if let Some(limit) = self.limit {
            id.push_str(&format!("|l:{limit}"));
        }
        if let Some(bound) = &self.start_at {
            id.push_str("|lb:");
            id.push_str(&bound.canonical_id());
        }
        if let Some(bound) = &self.end_at {
            id.push_str("|ub:");
            id.push_str(&bound.canonical_id());
        }
        id
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Target({})", self.canonical_id())
    }
}
