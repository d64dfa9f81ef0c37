use std::collections::{BTreeMap, HashMap, HashSet};

use crate::core::{FieldFilter, FilterOperator, OrderBy, OrderDirection, Target};
use crate::model::{FieldIndex, FieldPath, Segment, SegmentKind};
use crate::util::hard_assert;

/// Decides whether a [`FieldIndex`] can serve a [`Target`], and builds an
/// index that serves it when none exists.
///
/// An index serves a target when its segments map, in order, to:
///
/// - equality filters, in any order;
/// - at most one inequality field, ordered in the target's direction;
/// - a prefix of the target's order-by clauses.
///
/// An index may cover fewer segments than the target needs (the rest is
/// filtered in memory) but never segments the target does not constrain. The
/// `CONTAINS` segment is matched separately against array filters.
pub struct TargetIndexMatcher {
    collection_id: String,
    // One filter per field; several inequalities on the same field share a segment.
    inequality_filters: BTreeMap<FieldPath, FieldFilter>,
    equality_filters: Vec<FieldFilter>,
    order_bys: Vec<OrderBy>,
}

impl TargetIndexMatcher {
    pub fn new(target: &Target) -> Self {
        let mut inequality_filters = BTreeMap::new();
        let mut equality_filters = Vec::new();
        for filter in target.filters() {
            if filter.is_inequality() {
                inequality_filters
                    .entry(filter.field().clone())
                    .or_insert_with(|| filter.clone());
            } else {
                equality_filters.push(filter.clone());
            }
        }

        Self {
            collection_id: target.collection_group_id().to_string(),
            inequality_filters,
            equality_filters,
            order_bys: target.order_bys().to_vec(),
        }
    }

    /// True when inequalities constrain more than one distinct field. No
    /// single index can serve such a target.
    pub fn has_multiple_inequality(&self) -> bool {
        self.inequality_filters.len() > 1
    }

    /// Panics if the index belongs to a different collection group; callers
    /// are expected to look indexes up by the target's collection group.
    pub fn served_by_index(&self, index: &FieldIndex) -> bool {
        hard_assert(
            index.collection_group() == self.collection_id,
            "Collection IDs do not match",
        );

        if self.has_multiple_inequality() {
            return false;
        }

        if let Some(array_segment) = index.array_segment() {
            if !self.has_matching_equality_filter(array_segment) {
                return false;
            }
        }

        let segments = index.directional_segments();
        let mut segment_index = 0;

        // Equalities may appear in any order, so match them greedily first.
        let mut equality_segments: HashMap<&FieldPath, &Segment> = HashMap::new();
        while segment_index < segments.len()
            && self.has_matching_equality_filter(segments[segment_index])
        {
            equality_segments.insert(segments[segment_index].field_path(), segments[segment_index]);
            segment_index += 1;
        }

        if segment_index == segments.len() {
            return true;
        }

        // An `==` field holds a single value, so ordering by it is always
        // satisfied. An `in` field still has several values, and its
        // segment must run in the order-by's direction.
        let mut remaining_order_bys = Vec::with_capacity(self.order_bys.len());
        for order_by in &self.order_bys {
            match equality_segments.get(order_by.field()) {
                None => remaining_order_bys.push(order_by),
                Some(_) if self.has_single_value_filter(order_by.field()) => {}
                Some(segment) if matches_order_by(order_by, segment) => {}
                Some(_) => return false,
            }
        }
        let mut order_bys = remaining_order_bys.into_iter();

        if let Some(inequality) = self.inequality_filters.values().next() {
            if !equality_segments.contains_key(inequality.field()) {
                let segment = segments[segment_index];
                let matches_order = order_bys
                    .next()
                    .is_some_and(|order_by| matches_order_by(order_by, segment));
                if !matches_filter(inequality, segment) || !matches_order {
                    return false;
                }
                segment_index += 1;
            }
        }

        // The remaining segments must spell out a prefix of the order-bys.
        segments[segment_index..].iter().all(|segment| {
            order_bys
                .next()
                .is_some_and(|order_by| matches_order_by(order_by, segment))
        })
    }

    /// Builds an index that fully serves the target: equality fields, the
    /// inequality field, array fields, the remaining order-bys and finally
    /// the document key. Returns `None` when the target has inequalities on
    /// more than one field.
    pub fn build_target_index(&self) -> Option<FieldIndex> {
        if self.has_multiple_inequality() {
            return None;
        }

        let mut unique_fields: HashSet<FieldPath> = HashSet::new();
        let mut segments = Vec::new();

        for filter in &self.equality_filters {
            if filter.field().is_key_field() || filter.is_array_operator() {
                continue;
            }
            if unique_fields.insert(filter.field().clone()) {
                let direction = if self.has_single_value_filter(filter.field()) {
                    OrderDirection::Ascending
                } else {
                    self.order_by_direction(filter.field())
                };
                segments.push(Segment::new(filter.field().clone(), segment_kind(direction)));
            }
        }

        if let Some(inequality) = self.inequality_filters.values().next() {
            let field = inequality.field();
            if !field.is_key_field() && unique_fields.insert(field.clone()) {
                let direction = self.order_by_direction(field);
                segments.push(Segment::new(field.clone(), segment_kind(direction)));
            }
        }

        let mut array_fields: HashSet<&FieldPath> = HashSet::new();
        for filter in &self.equality_filters {
            if filter.is_array_operator()
                && !filter.field().is_key_field()
                && array_fields.insert(filter.field())
            {
                segments.push(Segment::new(filter.field().clone(), SegmentKind::Contains));
            }
        }

        // Normalized order-bys always end with the document key.
        for order_by in &self.order_bys {
            if unique_fields.insert(order_by.field().clone()) {
                segments.push(Segment::new(
                    order_by.field().clone(),
                    segment_kind(order_by.direction()),
                ));
            }
        }

        Some(FieldIndex::for_collection_group(self.collection_id.clone()).with_segments(segments))
    }

    fn has_single_value_filter(&self, field: &FieldPath) -> bool {
        self.equality_filters
            .iter()
            .any(|filter| filter.field() == field && filter.operator() == FilterOperator::Equal)
    }

    fn order_by_direction(&self, field: &FieldPath) -> OrderDirection {
        self.order_bys
            .iter()
            .find(|order_by| order_by.field() == field)
            .map(OrderBy::direction)
            .unwrap_or(OrderDirection::Ascending)
    }

    fn has_matching_equality_filter(&self, segment: &Segment) -> bool {
        self.equality_filters
            .iter()
            .any(|filter| matches_filter(filter, segment))
    }
}

fn segment_kind(direction: OrderDirection) -> SegmentKind {
    match direction {
        OrderDirection::Ascending => SegmentKind::Ascending,
        OrderDirection::Descending => SegmentKind::Descending,
    }
}

/// Array filters only match `CONTAINS` segments and every other filter only
/// matches directional segments.
fn matches_filter(filter: &FieldFilter, segment: &Segment) -> bool {
    filter.field() == segment.field_path()
        && (segment.kind() == SegmentKind::Contains) == filter.is_array_operator()
}

fn matches_order_by(order_by: &OrderBy, segment: &Segment) -> bool {
    order_by.field() == segment.field_path()
        && matches!(
            (segment.kind(), order_by.direction()),
            (SegmentKind::Ascending, OrderDirection::Ascending)
                | (SegmentKind::Descending, OrderDirection::Descending)
        )
}
