use crate::model::SnapshotVersion;
use crate::value::FirestoreValue;

/// The server's acknowledgement of a single mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationResult {
    version: SnapshotVersion,
    /// One entry per field transform, in order. Array transforms carry `None`
    /// because the backend does not echo their results.
    transform_results: Vec<Option<FirestoreValue>>,
}

impl MutationResult {
    pub fn new(version: SnapshotVersion, transform_results: Vec<Option<FirestoreValue>>) -> Self {
        Self {
            version,
            transform_results,
        }
    }

    /// Version at which the mutation was committed, or the document's update
    /// time for writes that did not change it.
    pub fn version(&self) -> SnapshotVersion {
        self.version
    }

    pub fn transform_results(&self) -> &[Option<FirestoreValue>] {
        &self.transform_results
    }
}
