use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::model::{FieldPath, SnapshotVersion};

/// How a single field is stored in an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKind {
    Ascending,
    Descending,
    /// Array membership, serves `array-contains` and `array-contains-any`.
    Contains,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Ascending => "ASCENDING",
            SegmentKind::Descending => "DESCENDING",
            SegmentKind::Contains => "CONTAINS",
        }
    }

    pub fn is_directional(&self) -> bool {
        !matches!(self, SegmentKind::Contains)
    }
}

impl Display for SegmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Segment {
    field_path: FieldPath,
    kind: SegmentKind,
}

impl Segment {
    pub fn new(field_path: FieldPath, kind: SegmentKind) -> Self {
        Self { field_path, kind }
    }

    pub fn field_path(&self) -> &FieldPath {
        &self.field_path
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.field_path
            .cmp(&other.field_path)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field_path, self.kind)
    }
}

/// An index definition for one collection group.
///
/// `PartialEq` compares every field including `index_id` and `update_time`;
/// use [`FieldIndex::semantic_cmp`] to compare index shapes only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldIndex {
    index_id: i32,
    collection_group: String,
    segments: Vec<Segment>,
    update_time: SnapshotVersion,
}

impl FieldIndex {
    /// Id of an index that has not been persisted yet.
    pub const UNKNOWN_ID: i32 = -1;

    pub fn new(
        index_id: i32,
        collection_group: impl Into<String>,
        segments: Vec<Segment>,
        update_time: SnapshotVersion,
    ) -> Self {
        Self {
            index_id,
            collection_group: collection_group.into(),
            segments,
            update_time,
        }
    }

    /// An unsaved index with no segments.
    pub fn for_collection_group(collection_group: impl Into<String>) -> Self {
        Self::new(
            Self::UNKNOWN_ID,
            collection_group,
            Vec::new(),
            SnapshotVersion::none(),
        )
    }

    pub fn index_id(&self) -> i32 {
        self.index_id
    }

    pub fn collection_group(&self) -> &str {
        &self.collection_group
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segments_len(&self) -> usize {
        self.segments.len()
    }

    pub fn update_time(&self) -> SnapshotVersion {
        self.update_time
    }

    /// The first `CONTAINS` segment, if any.
    pub fn array_segment(&self) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|segment| segment.kind == SegmentKind::Contains)
    }

    /// All ascending and descending segments, in index order.
    pub fn directional_segments(&self) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|segment| segment.kind.is_directional())
            .collect()
    }

    pub fn with_segment(mut self, field_path: FieldPath, kind: SegmentKind) -> Self {
        self.segments.push(Segment::new(field_path, kind));
        self
    }

    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    pub fn with_index_id(mut self, index_id: i32) -> Self {
        self.index_id = index_id;
        self
    }

    pub fn with_update_time(mut self, update_time: SnapshotVersion) -> Self {
        self.update_time = update_time;
        self
    }

    /// Orders by collection group, then segments; ignores id and update time.
    pub fn semantic_cmp(&self, other: &FieldIndex) -> Ordering {
        self.collection_group
            .cmp(&other.collection_group)
            .then_with(|| self.segments.cmp(&other.segments))
    }

    pub fn semantic_eq(&self, other: &FieldIndex) -> bool {
        self.semantic_cmp(other) == Ordering::Equal
    }
}

impl Display for FieldIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let segments: Vec<String> = self.segments.iter().map(Segment::to_string).collect();
        write!(
            f,
            "FieldIndex{{id={}, collectionGroup={}, segments=[{}]}}",
            self.index_id,
            self.collection_group,
            segments.join(", ")
        )
    }
}
