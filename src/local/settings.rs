use serde::Deserialize;

/// Knobs for the client-side index machinery, passed to the index manager at
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingSettings {
    /// Build an index for a target on first use when none fully serves it.
    pub auto_index_creation: bool,
    /// Whether configured indexes are backfilled from cached documents.
    pub index_backfill_enabled: bool,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            auto_index_creation: false,
            index_backfill_enabled: true,
        }
    }
}

impl IndexingSettings {
    pub fn with_auto_index_creation(mut self, enabled: bool) -> Self {
        self.auto_index_creation = enabled;
        self
    }
}
