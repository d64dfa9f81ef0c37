use std::collections::{BTreeMap, BTreeSet};

use crate::core::query_evaluator::apply_target_to_documents;
use crate::core::Target;
use crate::local::{DocumentOverlayCache, RemoteDocumentCache};
use crate::model::mutation::{MutationBatch, MutationSquasher, TouchedFields};
use crate::model::{DocumentKey, MutableDocument, Timestamp};

/// Combines the remote document cache with the overlays of pending writes to
/// produce the documents the user sees.
#[derive(Clone, Debug, Default)]
pub struct LocalDocumentsView<R, O> {
    remote_documents: R,
    overlays: O,
}

impl<R, O> LocalDocumentsView<R, O>
where
    R: RemoteDocumentCache,
    O: DocumentOverlayCache,
{
    pub fn new(remote_documents: R, overlays: O) -> Self {
        Self {
            remote_documents,
            overlays,
        }
    }

    pub fn remote_documents(&self) -> &R {
        &self.remote_documents
    }

    pub fn remote_documents_mut(&mut self) -> &mut R {
        &mut self.remote_documents
    }

    pub fn overlays(&self) -> &O {
        &self.overlays
    }

    pub fn overlays_mut(&mut self) -> &mut O {
        &mut self.overlays
    }

    /// The local view of one document: its cached state with the overlay
    /// applied. Unknown documents come back invalid.
    pub fn document(&self, key: &DocumentKey) -> MutableDocument {
        let mut document = self.remote_documents.get(key);
        if let Some(overlay) = self.overlays.overlay(key) {
            overlay
                .mutation()
                .apply_to_local_view(&mut document, TouchedFields::none(), Timestamp::now());
        }
        document
    }

    pub fn documents(&self, keys: &BTreeSet<DocumentKey>) -> BTreeMap<DocumentKey, MutableDocument> {
        keys.iter().map(|key| (key.clone(), self.document(key))).collect()
    }

    /// Runs `target` against the local view by scanning the cached documents
    /// and documents that only exist as overlays.
    pub fn documents_matching_target(&self, target: &Target) -> Vec<MutableDocument> {
        let mut documents = self.remote_documents.documents_matching_target(target);
        let local_write_time = Timestamp::now();
        for (key, overlay) in self.overlays.overlays_matching_target(target) {
            let document = documents
                .entry(key.clone())
                .or_insert_with(|| MutableDocument::new_invalid_document(key));
            overlay
                .mutation()
                .apply_to_local_view(document, TouchedFields::none(), local_write_time);
        }
        apply_target_to_documents(documents.into_values().collect(), target)
    }

    /// Replays `batches`, ordered by batch id, over the cached state of `keys`
    /// and stores one squashed overlay per document under the newest batch
    /// that wrote to it. Keys that none of `batches` write to end up without
    /// an overlay. Returns the resulting local documents.
    pub fn recalculate_and_save_overlays(
        &mut self,
        keys: &BTreeSet<DocumentKey>,
        batches: &[MutationBatch],
    ) -> BTreeMap<DocumentKey, MutableDocument> {
        let mut squashers: BTreeMap<DocumentKey, MutationSquasher> = keys
            .iter()
            .map(|key| (key.clone(), MutationSquasher::new(&self.remote_documents.get(key))))
            .collect();
        let mut largest_batch_ids: BTreeMap<DocumentKey, i32> = BTreeMap::new();

        for batch in batches {
            for key in batch.keys() {
                let Some(squasher) = squashers.get_mut(&key) else {
                    continue;
                };
                squasher.squash_batch(batch);
                largest_batch_ids.insert(key, batch.batch_id());
            }
        }

        // Keys with no pending write, or whose writes cancel out, lose any
        // overlay left from earlier batches.
        let mut overlays_by_batch_id: BTreeMap<i32, BTreeMap<DocumentKey, _>> = BTreeMap::new();
        for (key, squasher) in &squashers {
            let batch_id = largest_batch_ids.get(key);
            match (batch_id, squasher.mutation()) {
                (Some(batch_id), Some(mutation)) => {
                    overlays_by_batch_id
                        .entry(*batch_id)
                        .or_default()
                        .insert(key.clone(), mutation);
                }
                _ => self.overlays.remove_overlay(key),
            }
        }
        for (batch_id, overlays) in overlays_by_batch_id {
            log::debug!("Saving {} overlays for batch {}", overlays.len(), batch_id);
            self.overlays.save_overlays(batch_id, overlays);
        }

        squashers
            .into_iter()
            .map(|(key, squasher)| (key, squasher.into_document()))
            .collect()
    }
}
