use std::collections::{BTreeMap, BTreeSet};

use crate::core::Target;
use crate::model::{DocumentKey, MutableDocument};
use crate::util::hard_assert;

/// The last server-confirmed state of each cached document.
pub trait RemoteDocumentCache {
    /// Stores `document`, replacing any previous entry for its key.
    fn put(&mut self, document: MutableDocument);

    fn remove(&mut self, key: &DocumentKey);

    /// The cached document, or an invalid document when nothing is known.
    fn get(&self, key: &DocumentKey) -> MutableDocument;

    fn get_all(&self, keys: &BTreeSet<DocumentKey>) -> BTreeMap<DocumentKey, MutableDocument> {
        keys.iter().map(|key| (key.clone(), self.get(key))).collect()
    }

    /// Every cached document under the target's path or collection group.
    /// Filters are not applied.
    fn documents_matching_target(&self, target: &Target) -> BTreeMap<DocumentKey, MutableDocument>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryRemoteDocumentCache {
    documents: BTreeMap<DocumentKey, MutableDocument>,
}

impl MemoryRemoteDocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl RemoteDocumentCache for MemoryRemoteDocumentCache {
    fn put(&mut self, document: MutableDocument) {
        hard_assert(
            document.is_valid_document(),
            format!("Cannot cache invalid document {}", document.key()),
        );
        self.documents.insert(document.key().clone(), document);
    }

    fn remove(&mut self, key: &DocumentKey) {
        self.documents.remove(key);
    }

    fn get(&self, key: &DocumentKey) -> MutableDocument {
        self.documents
            .get(key)
            .cloned()
            .unwrap_or_else(|| MutableDocument::new_invalid_document(key.clone()))
    }

    fn documents_matching_target(&self, target: &Target) -> BTreeMap<DocumentKey, MutableDocument> {
        self.documents
            .iter()
            .filter(|(key, _)| target.matches_key(key))
            .map(|(key, document)| (key.clone(), document.clone()))
            .collect()
    }
}
