use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::{invalid_argument, FirestoreResult};
use crate::model::ResourcePath;
use crate::util::hard_assert;

/// Identifies a document: a resource path with an even number of segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    path: ResourcePath,
}

impl DocumentKey {
    /// Builds a key from a path known to be valid. Panics on an odd path.
    pub fn new(path: ResourcePath) -> Self {
        hard_assert(
            Self::is_document_key(&path),
            format!("Not a document key path: {path}"),
        );
        Self { path }
    }

    pub fn from_path(path: ResourcePath) -> FirestoreResult<Self> {
        if !Self::is_document_key(&path) {
            return Err(invalid_argument(format!(
                "Invalid document reference. Document references must have an even number of \
                 segments, but {path} has {}",
                path.len()
            )));
        }
        Ok(Self { path })
    }

    pub fn from_string(path: &str) -> FirestoreResult<Self> {
        let resource = ResourcePath::from_string(path)?;
        Self::from_path(resource)
    }

    pub fn is_document_key(path: &ResourcePath) -> bool {
        !path.is_empty() && path.len() % 2 == 0
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    pub fn collection_path(&self) -> ResourcePath {
        self.path.without_last()
    }

    /// The id of the collection directly containing this document.
    pub fn collection_group(&self) -> &str {
        // Keys always hold at least two segments.
        self.path.segment(self.path.len() - 2).unwrap_or_default()
    }

    pub fn id(&self) -> &str {
        self.path.last_segment().unwrap_or_default()
    }

    pub fn has_collection_id(&self, collection_id: &str) -> bool {
        self.collection_group() == collection_id
    }
}

impl Ord for DocumentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl PartialOrd for DocumentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for DocumentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_even_segments() {
        let err = DocumentKey::from_string("cities").unwrap_err();
        assert_eq!(err.code_str(), "firestore/invalid-argument");
        assert!(DocumentKey::from_string("").is_err());
    }

    #[test]
    fn parses_valid_path() {
        let key = DocumentKey::from_string("cities/sf").unwrap();
        assert_eq!(key.id(), "sf");
        assert_eq!(key.collection_group(), "cities");
        assert_eq!(key.collection_path().canonical_string(), "cities");
    }

    #[test]
    #[should_panic(expected = "INTERNAL ASSERTION FAILED")]
    fn new_panics_on_odd_path() {
        DocumentKey::new(ResourcePath::from_segments(["a", "b", "c"]));
    }

    #[test]
    fn orders_by_path() {
        let a = DocumentKey::from_string("a/1").unwrap();
        let nested = DocumentKey::from_string("a/1/b/1").unwrap();
        let b = DocumentKey::from_string("a/2").unwrap();
        assert!(a < nested);
        assert!(nested < b);
    }
}
