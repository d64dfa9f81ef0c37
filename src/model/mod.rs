mod database_id;
mod document;
mod document_key;
mod field_index;
mod field_mask;
mod field_path;
mod geo_point;
pub mod mutation;
mod object_value;
mod resource_path;
mod snapshot_version;
mod target_index_matcher;
mod timestamp;

pub use database_id::{DatabaseId, DEFAULT_DATABASE_ID};
pub use document::{DocumentState, DocumentType, MutableDocument};
pub use document_key::DocumentKey;
pub use field_index::{FieldIndex, Segment, SegmentKind};
pub use field_mask::FieldMask;
pub use field_path::{FieldPath, IntoFieldPath};
pub use geo_point::GeoPoint;
pub use object_value::{ObjectValue, ObjectValueBuilder};
pub use resource_path::ResourcePath;
pub use snapshot_version::SnapshotVersion;
pub use target_index_matcher::TargetIndexMatcher;
pub use timestamp::Timestamp;
