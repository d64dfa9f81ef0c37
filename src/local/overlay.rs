use std::collections::{BTreeMap, BTreeSet};

use crate::core::Target;
use crate::model::mutation::Mutation;
use crate::model::DocumentKey;

/// The squashed pending mutation for one document, tagged with the newest
/// batch that contributed to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Overlay {
    largest_batch_id: i32,
    mutation: Mutation,
}

impl Overlay {
    pub fn new(largest_batch_id: i32, mutation: Mutation) -> Self {
        Self {
            largest_batch_id,
            mutation,
        }
    }

    pub fn largest_batch_id(&self) -> i32 {
        self.largest_batch_id
    }

    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }

    pub fn key(&self) -> &DocumentKey {
        self.mutation.key()
    }
}

/// Storage for the overlay of every document with pending writes.
pub trait DocumentOverlayCache {
    fn overlay(&self, key: &DocumentKey) -> Option<Overlay>;

    /// Overlays for documents under the target's path or collection group.
    fn overlays_matching_target(&self, target: &Target) -> BTreeMap<DocumentKey, Overlay>;

    /// Saves each mutation as the overlay of its key, tagged with
    /// `largest_batch_id`.
    fn save_overlays(&mut self, largest_batch_id: i32, overlays: BTreeMap<DocumentKey, Mutation>);

    fn remove_overlay(&mut self, key: &DocumentKey);

    /// Drops the overlays last written for `batch_id`.
    fn remove_overlays_for_batch_id(&mut self, batch_id: i32);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryDocumentOverlayCache {
    overlays: BTreeMap<DocumentKey, Overlay>,
    keys_by_batch_id: BTreeMap<i32, BTreeSet<DocumentKey>>,
}

impl MemoryDocumentOverlayCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn forget_batch_key(&mut self, key: &DocumentKey) {
        let Some(existing) = self.overlays.get(key) else {
            return;
        };
        let batch_id = existing.largest_batch_id();
        if let Some(keys) = self.keys_by_batch_id.get_mut(&batch_id) {
            keys.remove(key);
            if keys.is_empty() {
                self.keys_by_batch_id.remove(&batch_id);
            }
        }
    }
}

impl DocumentOverlayCache for MemoryDocumentOverlayCache {
    fn overlay(&self, key: &DocumentKey) -> Option<Overlay> {
        self.overlays.get(key).cloned()
    }

    fn overlays_matching_target(&self, target: &Target) -> BTreeMap<DocumentKey, Overlay> {
        self.overlays
            .iter()
            .filter(|(key, _)| target.matches_key(key))
            .map(|(key, overlay)| (key.clone(), overlay.clone()))
            .collect()
    }

    fn save_overlays(&mut self, largest_batch_id: i32, overlays: BTreeMap<DocumentKey, Mutation>) {
        for (key, mutation) in overlays {
            self.forget_batch_key(&key);
            self.keys_by_batch_id
                .entry(largest_batch_id)
                .or_default()
                .insert(key.clone());
            self.overlays
                .insert(key, Overlay::new(largest_batch_id, mutation));
        }
    }

    fn remove_overlay(&mut self, key: &DocumentKey) {
        self.forget_batch_key(key);
        self.overlays.remove(key);
    }

    fn remove_overlays_for_batch_id(&mut self, batch_id: i32) {
        if let Some(keys) = self.keys_by_batch_id.remove(&batch_id) {
            for key in keys {
                self.overlays.remove(&key);
            }
        }
    }
}
