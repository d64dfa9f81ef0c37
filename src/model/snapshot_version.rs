use std::fmt::{Display, Formatter};

use crate::model::Timestamp;

/// The server version of a document or of the whole remote snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotVersion {
    timestamp: Timestamp,
}

impl SnapshotVersion {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// The version used for documents the client has never seen at the server.
    pub fn none() -> Self {
        Self::new(Timestamp::new(0, 0))
    }

    pub fn is_none(&self) -> bool {
        *self == Self::none()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Default for SnapshotVersion {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Timestamp> for SnapshotVersion {
    fn from(timestamp: Timestamp) -> Self {
        Self::new(timestamp)
    }
}

impl Display for SnapshotVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SnapshotVersion({})", self.timestamp)
    }
}
