use crate::model::{MutableDocument, SnapshotVersion};

/// A server-side guard checked before a mutation is committed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Precondition {
    #[default]
    None,
    /// The document must (or must not) exist.
    Exists(bool),
    /// The document must exist at exactly this version.
    UpdateTime(SnapshotVersion),
}

impl Precondition {
    pub fn is_none(&self) -> bool {
        matches!(self, Precondition::None)
    }

    /// Whether the cached document satisfies the precondition.
    pub fn is_valid_for(&self, document: &MutableDocument) -> bool {
        match self {
            Precondition::None => true,
            Precondition::Exists(exists) => *exists == document.is_found_document(),
            Precondition::UpdateTime(version) => {
                document.is_found_document() && document.version() == *version
            }
        }
    }
}
