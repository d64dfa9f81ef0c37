use std::cmp::Ordering;

use crate::model::{DatabaseId, DocumentKey};

/// A pointer to another document, possibly in another database.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReferenceValue {
    database_id: DatabaseId,
    key: DocumentKey,
}

impl ReferenceValue {
    pub fn new(database_id: DatabaseId, key: DocumentKey) -> Self {
        Self { database_id, key }
    }

    pub fn database_id(&self) -> &DatabaseId {
        &self.database_id
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Orders by database, then by document path.
    pub fn compare(&self, other: &ReferenceValue) -> Ordering {
        self.database_id
            .cmp(&other.database_id)
            .then_with(|| self.key.cmp(&other.key))
    }
}
