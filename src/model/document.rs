use std::fmt::{Display, Formatter};

use crate::model::{DocumentKey, FieldPath, ObjectValue, SnapshotVersion};
use crate::value::FirestoreValue;

/// What the client knows about a document's existence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentType {
    /// Nothing is known; the document is not in the cache.
    Invalid,
    FoundDocument,
    NoDocument,
    /// The document was written but its server state is not yet known.
    UnknownDocument,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentState {
    Synced,
    HasLocalMutations,
    HasCommittedMutations,
}

/// The local representation of a document, mutated in place by mutation
/// application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutableDocument {
    key: DocumentKey,
    document_type: DocumentType,
    version: SnapshotVersion,
    value: ObjectValue,
    document_state: DocumentState,
}

impl MutableDocument {
    fn with_parts(
        key: DocumentKey,
        document_type: DocumentType,
        version: SnapshotVersion,
        value: ObjectValue,
        document_state: DocumentState,
    ) -> Self {
        Self {
            key,
            document_type,
            version,
            value,
            document_state,
        }
    }

    pub fn new_invalid_document(key: DocumentKey) -> Self {
        Self::with_parts(
            key,
            DocumentType::Invalid,
            SnapshotVersion::none(),
            ObjectValue::empty(),
            DocumentState::Synced,
        )
    }

    pub fn new_found_document(key: DocumentKey, version: SnapshotVersion, value: ObjectValue) -> Self {
        let mut document = Self::new_invalid_document(key);
        document.convert_to_found_document(version, value);
        document
    }

    pub fn new_no_document(key: DocumentKey, version: SnapshotVersion) -> Self {
        let mut document = Self::new_invalid_document(key);
        document.convert_to_no_document(version);
        document
    }

    pub fn new_unknown_document(key: DocumentKey, version: SnapshotVersion) -> Self {
        let mut document = Self::new_invalid_document(key);
        document.convert_to_unknown_document(version);
        document
    }

    pub fn convert_to_found_document(&mut self, version: SnapshotVersion, value: ObjectValue) -> &mut Self {
        self.version = version;
        self.document_type = DocumentType::FoundDocument;
        self.value = value;
        self.document_state = DocumentState::Synced;
        self
    }

    pub fn convert_to_no_document(&mut self, version: SnapshotVersion) -> &mut Self {
        self.version = version;
        self.document_type = DocumentType::NoDocument;
        self.value = ObjectValue::empty();
        self.document_state = DocumentState::Synced;
        self
    }

    /// Marks the document as acknowledged by the backend with unknown contents.
    pub fn convert_to_unknown_document(&mut self, version: SnapshotVersion) -> &mut Self {
        self.version = version;
        self.document_type = DocumentType::UnknownDocument;
        self.value = ObjectValue::empty();
        self.document_state = DocumentState::HasCommittedMutations;
        self
    }

    pub fn set_has_committed_mutations(&mut self) -> &mut Self {
        self.document_state = DocumentState::HasCommittedMutations;
        self
    }

    pub fn set_has_local_mutations(&mut self) -> &mut Self {
        self.document_state = DocumentState::HasLocalMutations;
        self
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn version(&self) -> SnapshotVersion {
        self.version
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn document_state(&self) -> DocumentState {
        self.document_state
    }

    pub fn data(&self) -> &ObjectValue {
        &self.value
    }

    pub fn data_mut(&mut self) -> &mut ObjectValue {
        &mut self.value
    }

    pub fn field(&self, path: &FieldPath) -> Option<&FirestoreValue> {
        self.value.get(path)
    }

    pub fn has_local_mutations(&self) -> bool {
        self.document_state == DocumentState::HasLocalMutations
    }

    pub fn has_committed_mutations(&self) -> bool {
        self.document_state == DocumentState::HasCommittedMutations
    }

    pub fn has_pending_writes(&self) -> bool {
        self.has_local_mutations() || self.has_committed_mutations()
    }

    pub fn is_valid_document(&self) -> bool {
        self.document_type != DocumentType::Invalid
    }

    pub fn is_found_document(&self) -> bool {
        self.document_type == DocumentType::FoundDocument
    }

    pub fn is_no_document(&self) -> bool {
        self.document_type == DocumentType::NoDocument
    }

    pub fn is_unknown_document(&self) -> bool {
        self.document_type == DocumentType::UnknownDocument
    }
}

impl Display for MutableDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Document{{key={}, version={}, type={:?}, documentState={:?}, value={}}}",
            self.key, self.version, self.document_type, self.document_state, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Timestamp;

    fn key() -> DocumentKey {
        DocumentKey::from_string("coll/doc").unwrap()
    }

    fn version(seconds: i64) -> SnapshotVersion {
        SnapshotVersion::new(Timestamp::new(seconds, 0))
    }

    #[test]
    fn converters_update_type_and_state() {
        let mut document = MutableDocument::new_invalid_document(key());
        assert!(!document.is_valid_document());

        let mut data = ObjectValue::empty();
        data.set(&FieldPath::from_single_segment("a"), FirestoreValue::from_integer(1));
        document.convert_to_found_document(version(1), data).set_has_local_mutations();
        assert!(document.is_found_document());
        assert!(document.has_local_mutations());
        assert!(document.has_pending_writes());

        document.convert_to_no_document(version(2));
        assert!(document.is_no_document());
        assert!(document.data().is_empty());
        assert_eq!(document.document_state(), DocumentState::Synced);

        document.convert_to_unknown_document(version(3));
        assert!(document.is_unknown_document());
        assert!(document.has_committed_mutations());
        assert_eq!(document.version(), version(3));
    }

    #[test]
    fn equality_includes_state() {
        let synced = MutableDocument::new_no_document(key(), version(1));
        let mut local = synced.clone();
        local.set_has_local_mutations();
        assert_ne!(synced, local);
    }
}
