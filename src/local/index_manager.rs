use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::Target;
use crate::error::{not_found, FirestoreResult};
use crate::local::IndexingSettings;
use crate::model::{FieldIndex, ResourcePath, TargetIndexMatcher};
use crate::util::hard_assert;

/// How well the registered indexes serve a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexType {
    /// No index serves the target.
    None,
    /// An index serves the filters but results still need in-memory
    /// filtering or sorting.
    Partial,
    /// An index serves every filter and order-by.
    Full,
}

/// Registry of collection parents and client-side field indexes.
pub trait IndexManager {
    /// Records that documents exist under `collection_path`, so collection
    /// group queries know where to look.
    fn add_to_collection_parent_index(&mut self, collection_path: &ResourcePath);

    /// Parent paths of every collection named `collection_id`.
    fn collection_parents(&self, collection_id: &str) -> Vec<ResourcePath>;

    /// Registers `index` under a freshly assigned id and returns that id.
    fn add_field_index(&mut self, index: FieldIndex) -> i32;

    fn delete_field_index(&mut self, index: &FieldIndex) -> FirestoreResult<()>;

    fn delete_all_field_indexes(&mut self);

    fn field_indexes(&self, collection_group: &str) -> Vec<FieldIndex>;

    fn all_field_indexes(&self) -> Vec<FieldIndex>;

    /// Builds and registers an index for `target` when no registered index
    /// fully serves it.
    fn create_target_indexes(&mut self, target: &Target);

    /// The serving index with the most segments, if any.
    fn field_index(&self, target: &Target) -> Option<FieldIndex> {
        if target.is_document_query() {
            return None;
        }
        let matcher = TargetIndexMatcher::new(target);
        self.field_indexes(target.collection_group_id())
            .into_iter()
            .filter(|index| matcher.served_by_index(index))
            .fold(None, |best: Option<FieldIndex>, index| match best {
                Some(best) if best.segments_len() >= index.segments_len() => Some(best),
                _ => Some(index),
            })
    }

    fn index_type(&self, target: &Target) -> IndexType {
        let Some(index) = self.field_index(target) else {
            return IndexType::None;
        };
        // The document key is not part of the target's segment count.
        let field_segments = index
            .segments()
            .iter()
            .filter(|segment| !segment.field_path().is_key_field())
            .count();
        if field_segments < target.segment_count() {
            IndexType::Partial
        } else {
            IndexType::Full
        }
    }

    /// Replaces the registered indexes with `indexes`, keeping the ones that
    /// are semantically unchanged so their ids survive.
    fn configure_field_indexes(&mut self, indexes: Vec<FieldIndex>) -> FirestoreResult<()> {
        let mut existing = self.all_field_indexes();
        existing.sort_by(FieldIndex::semantic_cmp);
        let mut desired = indexes;
        desired.sort_by(FieldIndex::semantic_cmp);
        desired.dedup_by(|left, right| left.semantic_eq(right));

        let mut existing = existing.into_iter().peekable();
        let mut desired = desired.into_iter().peekable();
        loop {
            let ordering = match (existing.peek(), desired.peek()) {
                (None, None) => break,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(current), Some(wanted)) => current.semantic_cmp(wanted),
            };
            match ordering {
                Ordering::Less => {
                    if let Some(stale) = existing.next() {
                        self.delete_field_index(&stale)?;
                    }
                }
                Ordering::Greater => {
                    if let Some(added) = desired.next() {
                        self.add_field_index(added);
                    }
                }
                Ordering::Equal => {
                    existing.next();
                    desired.next();
                }
            }
        }
        Ok(())
    }
}

/// In-memory [`IndexManager`].
#[derive(Clone, Debug)]
pub struct MemoryIndexManager {
    settings: IndexingSettings,
    collection_parents: BTreeMap<String, BTreeSet<ResourcePath>>,
    indexes: BTreeMap<String, BTreeMap<i32, FieldIndex>>,
    max_index_id: i32,
}

impl MemoryIndexManager {
    pub fn new(settings: IndexingSettings) -> Self {
        Self {
            settings,
            collection_parents: BTreeMap::new(),
            indexes: BTreeMap::new(),
            max_index_id: -1,
        }
    }

    pub fn settings(&self) -> &IndexingSettings {
        &self.settings
    }
}

impl Default for MemoryIndexManager {
    fn default() -> Self {
        Self::new(IndexingSettings::default())
    }
}

impl IndexManager for MemoryIndexManager {
    fn add_to_collection_parent_index(&mut self, collection_path: &ResourcePath) {
        hard_assert(collection_path.len() % 2 == 1, "Expected a collection path.");
        let Some(collection_id) = collection_path.last_segment() else {
            return;
        };
        self.collection_parents
            .entry(collection_id.to_string())
            .or_default()
            .insert(collection_path.without_last());
    }

    fn collection_parents(&self, collection_id: &str) -> Vec<ResourcePath> {
        self.collection_parents
            .get(collection_id)
            .map(|parents| parents.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn add_field_index(&mut self, index: FieldIndex) -> i32 {
        self.max_index_id += 1;
        let index_id = self.max_index_id;
        log::debug!("Adding field index {} with id {}", index, index_id);
        let index = index.with_index_id(index_id);
        self.indexes
            .entry(index.collection_group().to_string())
            .or_default()
            .insert(index_id, index);
        index_id
    }

    fn delete_field_index(&mut self, index: &FieldIndex) -> FirestoreResult<()> {
        let removed = self
            .indexes
            .get_mut(index.collection_group())
            .and_then(|group| group.remove(&index.index_id()));
        match removed {
            Some(removed) => {
                log::debug!("Deleted field index {} with id {}", removed, removed.index_id());
                Ok(())
            }
            None => Err(not_found(format!(
                "No field index with id {} for collection group {}",
                index.index_id(),
                index.collection_group()
            ))),
        }
    }

    fn delete_all_field_indexes(&mut self) {
        log::debug!("Deleting all field indexes");
        self.indexes.clear();
    }

    fn field_indexes(&self, collection_group: &str) -> Vec<FieldIndex> {
        self.indexes
            .get(collection_group)
            .map(|group| group.values().cloned().collect())
            .unwrap_or_default()
    }

    fn all_field_indexes(&self) -> Vec<FieldIndex> {
        self.indexes
            .values()
            .flat_map(|group| group.values().cloned())
            .collect()
    }

    fn create_target_indexes(&mut self, target: &Target) {
        if !self.settings.auto_index_creation {
            return;
        }
        if target.is_document_query() {
            return;
        }
        let index_type = self.index_type(target);
        if index_type == IndexType::Full {
            return;
        }
        match TargetIndexMatcher::new(target).build_target_index() {
            Some(index) => {
                log::debug!(
                    "Creating {} index for target {} ({:?} before)",
                    index.collection_group(),
                    target.canonical_id(),
                    index_type
                );
                self.add_field_index(index);
            }
            None => log::debug!(
                "Target {} cannot be served by a single index",
                target.canonical_id()
            ),
        }
    }
}
