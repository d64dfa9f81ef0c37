use std::collections::{BTreeMap, BTreeSet};

use crate::model::mutation::{
    calculate_overlay_mutation, Mutation, MutationResult, MutationSquasher, TouchedFields,
};
use crate::model::{DocumentKey, MutableDocument, SnapshotVersion, Timestamp};
use crate::util::hard_assert;

/// Mutations written together by one local write, applied atomically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationBatch {
    /// Monotonic identifier assigned locally when the batch is queued.
    batch_id: i32,
    local_write_time: Timestamp,
    /// Mutations that only establish the base state for idempotent
    /// transforms. They are applied locally but never sent.
    base_mutations: Vec<Mutation>,
    mutations: Vec<Mutation>,
}

impl MutationBatch {
    pub fn new(
        batch_id: i32,
        local_write_time: Timestamp,
        base_mutations: Vec<Mutation>,
        mutations: Vec<Mutation>,
    ) -> Self {
        hard_assert(!mutations.is_empty(), "Cannot create an empty mutation batch");
        Self {
            batch_id,
            local_write_time,
            base_mutations,
            mutations,
        }
    }

    pub fn batch_id(&self) -> i32 {
        self.batch_id
    }

    pub fn local_write_time(&self) -> Timestamp {
        self.local_write_time
    }

    pub fn base_mutations(&self) -> &[Mutation] {
        &self.base_mutations
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Every document key this batch writes to.
    pub fn keys(&self) -> BTreeSet<DocumentKey> {
        self.mutations
            .iter()
            .map(|mutation| mutation.key().clone())
            .collect()
    }

    /// Applies the acknowledged mutations for `document`'s key.
    pub fn apply_to_remote_document(
        &self,
        document: &mut MutableDocument,
        batch_result: &MutationBatchResult,
    ) {
        let results = batch_result.mutation_results();
        hard_assert(
            results.len() == self.mutations.len(),
            format!(
                "Mismatch between mutations length ({}) and results length ({})",
                self.mutations.len(),
                results.len()
            ),
        );
        for (mutation, result) in self.mutations.iter().zip(results) {
            if mutation.key() == document.key() {
                mutation.apply_to_remote_document(document, result);
            }
        }
    }

    /// Applies the base mutations and then the mutations for `document`'s
    /// key, threading the touched fields through.
    pub fn apply_to_local_view(
        &self,
        document: &mut MutableDocument,
        mut touched: TouchedFields,
    ) -> TouchedFields {
        for mutation in self.base_mutations.iter().chain(&self.mutations) {
            if mutation.key() == document.key() {
                touched = mutation.apply_to_local_view(document, touched, self.local_write_time);
            }
        }
        touched
    }

    /// Replays this batch on every squasher it writes to and returns the
    /// overlay each affected document needs after this batch.
    ///
    /// Documents in `documents_without_remote_version` have no base the server
    /// knows about, so their overlay always rewrites the whole document.
    pub fn apply_to_local_document_set(
        &self,
        documents: &mut BTreeMap<DocumentKey, MutationSquasher>,
        documents_without_remote_version: &BTreeSet<DocumentKey>,
    ) -> BTreeMap<DocumentKey, Mutation> {
        let mut overlays = BTreeMap::new();
        for key in self.keys() {
            let Some(squasher) = documents.get_mut(&key) else {
                log::warn!("No base document for {} in batch {}", key, self.batch_id);
                continue;
            };
            squasher.squash_batch(self);
            let overlay = if documents_without_remote_version.contains(&key) {
                calculate_overlay_mutation(squasher.document(), &TouchedFields::All)
            } else {
                squasher.mutation()
            };
            if let Some(overlay) = overlay {
                overlays.insert(key, overlay);
            }
            if !squasher.document().is_valid_document() {
                squasher
                    .document_mut()
                    .convert_to_no_document(SnapshotVersion::none());
            }
        }
        overlays
    }
}

/// The backend's acknowledgement of a whole [`MutationBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationBatchResult {
    batch: MutationBatch,
    commit_version: SnapshotVersion,
    mutation_results: Vec<MutationResult>,
    doc_versions: BTreeMap<DocumentKey, SnapshotVersion>,
}

impl MutationBatchResult {
    pub fn new(
        batch: MutationBatch,
        commit_version: SnapshotVersion,
        mutation_results: Vec<MutationResult>,
    ) -> Self {
        hard_assert(
            batch.mutations().len() == mutation_results.len(),
            format!(
                "Mutations sent {} must equal results received {}",
                batch.mutations().len(),
                mutation_results.len()
            ),
        );
        let doc_versions = batch
            .mutations()
            .iter()
            .zip(&mutation_results)
            .map(|(mutation, result)| (mutation.key().clone(), result.version()))
            .collect();
        Self {
            batch,
            commit_version,
            mutation_results,
            doc_versions,
        }
    }

    pub fn batch(&self) -> &MutationBatch {
        &self.batch
    }

    pub fn commit_version(&self) -> SnapshotVersion {
        self.commit_version
    }

    pub fn mutation_results(&self) -> &[MutationResult] {
        &self.mutation_results
    }

    /// The committed version of each written document.
    pub fn doc_versions(&self) -> &BTreeMap<DocumentKey, SnapshotVersion> {
        &self.doc_versions
    }
}
