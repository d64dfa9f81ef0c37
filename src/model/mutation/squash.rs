use crate::model::mutation::{Mutation, MutationBatch, MutationKind, TouchedFields};
use crate::model::{FieldMask, MutableDocument, ObjectValue, Timestamp};

/// Replays pending mutations against a scratch copy of a document and emits one
/// mutation with the same local effect.
///
/// The squasher owns its copy of the base document, so the caller's document
/// is never modified.
#[derive(Clone, Debug)]
pub struct MutationSquasher {
    document: MutableDocument,
    touched: TouchedFields,
}

impl MutationSquasher {
    pub fn new(base: &MutableDocument) -> Self {
        Self {
            document: base.clone(),
            touched: TouchedFields::none(),
        }
    }

    pub fn squash(&mut self, mutation: &Mutation, local_write_time: Timestamp) -> &mut Self {
        let touched = std::mem::take(&mut self.touched);
        self.touched = mutation.apply_to_local_view(&mut self.document, touched, local_write_time);
        self
    }

    /// Replays the mutations of `batch` that target this document.
    pub fn squash_batch(&mut self, batch: &MutationBatch) -> &mut Self {
        let touched = std::mem::take(&mut self.touched);
        self.touched = batch.apply_to_local_view(&mut self.document, touched);
        self
    }

    /// The document with every replayed mutation applied.
    pub fn document(&self) -> &MutableDocument {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut MutableDocument {
        &mut self.document
    }

    pub fn touched_fields(&self) -> &TouchedFields {
        &self.touched
    }

    pub fn into_document(self) -> MutableDocument {
        self.document
    }

    /// The squashed mutation, or `None` when the replayed mutations leave no
    /// local trace.
    pub fn mutation(&self) -> Option<Mutation> {
        let mutation = calculate_overlay_mutation(&self.document, &self.touched);
        if let Some(mutation) = &mutation {
            log::debug!(
                "Squashed local mutations for {} into {}",
                self.document.key(),
                kind_name(mutation.kind())
            );
        }
        mutation
    }
}

/// Squashes `mutations`, all written at `local_write_time`, on top of `base`.
pub fn squash(
    base: &MutableDocument,
    mutations: &[Mutation],
    local_write_time: Timestamp,
) -> Option<Mutation> {
    let mut squasher = MutationSquasher::new(base);
    for mutation in mutations {
        squasher.squash(mutation, local_write_time);
    }
    squasher.mutation()
}

/// Builds the mutation that turns the base of `document` into `document`,
/// given the fields local mutations touched.
///
/// When everything was touched the result is a set, or a delete for a
/// tombstone. Otherwise it is a patch without precondition over the touched
/// paths. A touched path whose value no longer exists is widened to its parent,
/// so that a container emptied by deletes is rewritten as a whole.
pub fn calculate_overlay_mutation(
    document: &MutableDocument,
    touched: &TouchedFields,
) -> Option<Mutation> {
    if !document.has_local_mutations() {
        return None;
    }
    let mask = match touched {
        TouchedFields::All => {
            let key = document.key().clone();
            return Some(if document.is_no_document() {
                Mutation::delete(key)
            } else {
                Mutation::set(key, document.data().clone())
            });
        }
        TouchedFields::Fields(mask) if mask.is_empty() => return None,
        TouchedFields::Fields(mask) => mask,
    };

    let data = document.data();
    let mut patch_value = ObjectValue::empty();
    let mut patch_mask = FieldMask::empty();
    for path in mask.iter() {
        if patch_mask.contains(path) {
            continue;
        }
        let path = if data.get(path).is_none() && path.len() > 1 {
            path.pop_last()
        } else {
            path.clone()
        };
        if let Some(value) = data.get(&path) {
            patch_value.set(&path, value.clone());
        }
        patch_mask.insert(path);
    }
    Some(Mutation::merge(document.key().clone(), patch_value, patch_mask))
}

fn kind_name(kind: &MutationKind) -> &'static str {
    match kind {
        MutationKind::Set { .. } => "set",
        MutationKind::Patch { .. } => "patch",
        MutationKind::Delete => "delete",
        MutationKind::Verify => "verify",
        MutationKind::Transform => "transform",
    }
}
