use crate::model::mutation::{FieldTransform, MutationResult, Precondition};
use crate::model::{
    DocumentKey, FieldMask, FieldPath, MutableDocument, ObjectValue, SnapshotVersion, Timestamp,
};
use crate::util::hard_assert;
use crate::value::FirestoreValue;

/// A single pending write against one document.
///
/// Every variant shares the key, the precondition and the list of field
/// transforms; the [`MutationKind`] decides what happens to the document body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    key: DocumentKey,
    precondition: Precondition,
    field_transforms: Vec<FieldTransform>,
    kind: MutationKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// Replace the whole document.
    Set { value: ObjectValue },
    /// Merge `data` into the document, restricted to `mask`. Paths in the mask
    /// that are absent from `data` are deleted.
    Patch { data: ObjectValue, mask: FieldMask },
    Delete,
    /// Check the precondition without writing.
    Verify,
    /// Apply the field transforms to an existing document.
    Transform,
}

/// The fields a sequence of local applications has touched so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TouchedFields {
    /// The whole document was replaced or deleted.
    All,
    Fields(FieldMask),
}

impl TouchedFields {
    pub fn none() -> Self {
        TouchedFields::Fields(FieldMask::empty())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TouchedFields::All)
    }

    pub fn mask(&self) -> Option<&FieldMask> {
        match self {
            TouchedFields::All => None,
            TouchedFields::Fields(mask) => Some(mask),
        }
    }

    fn with_paths<'a, I>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = &'a FieldPath>,
    {
        match self {
            TouchedFields::All => TouchedFields::All,
            TouchedFields::Fields(mut mask) => {
                for path in paths {
                    mask.insert(path.clone());
                }
                TouchedFields::Fields(mask)
            }
        }
    }
}

impl Default for TouchedFields {
    fn default() -> Self {
        Self::none()
    }
}

impl Mutation {
    fn with_kind(key: DocumentKey, precondition: Precondition, kind: MutationKind) -> Self {
        Self {
            key,
            precondition,
            field_transforms: Vec::new(),
            kind,
        }
    }

    pub fn set(key: DocumentKey, value: ObjectValue) -> Self {
        Self::with_kind(key, Precondition::None, MutationKind::Set { value })
    }

    /// A patch that requires the document to exist on the server.
    pub fn patch(key: DocumentKey, data: ObjectValue, mask: FieldMask) -> Self {
        Self::with_kind(key, Precondition::Exists(true), MutationKind::Patch { data, mask })
    }

    /// A patch without precondition, as produced by `set(..., merge)`.
    pub fn merge(key: DocumentKey, data: ObjectValue, mask: FieldMask) -> Self {
        Self::with_kind(key, Precondition::None, MutationKind::Patch { data, mask })
    }

    /// A patch whose mask is every leaf path of `data`.
    pub fn update(key: DocumentKey, data: ObjectValue) -> Self {
        let mask = data.field_mask();
        Self::patch(key, data, mask)
    }

    pub fn delete(key: DocumentKey) -> Self {
        Self::with_kind(key, Precondition::None, MutationKind::Delete)
    }

    pub fn verify(key: DocumentKey, version: SnapshotVersion) -> Self {
        Self::with_kind(key, Precondition::UpdateTime(version), MutationKind::Verify)
    }

    pub fn transform(key: DocumentKey, field_transforms: Vec<FieldTransform>) -> Self {
        Self::with_kind(key, Precondition::Exists(true), MutationKind::Transform)
            .with_field_transforms(field_transforms)
    }

    pub fn with_precondition(mut self, precondition: Precondition) -> Self {
        self.precondition = precondition;
        self
    }

    pub fn with_field_transforms(mut self, field_transforms: Vec<FieldTransform>) -> Self {
        hard_assert(
            field_transforms.is_empty()
                || !matches!(self.kind, MutationKind::Delete | MutationKind::Verify),
            "Delete and verify mutations cannot carry field transforms",
        );
        self.field_transforms = field_transforms;
        self
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    pub fn precondition(&self) -> Precondition {
        self.precondition
    }

    pub fn field_transforms(&self) -> &[FieldTransform] {
        &self.field_transforms
    }

    pub fn kind(&self) -> &MutationKind {
        &self.kind
    }

    /// The paths written by this mutation's field transforms.
    pub fn field_transform_paths(&self) -> impl Iterator<Item = &FieldPath> {
        self.field_transforms.iter().map(FieldTransform::field_path)
    }

    /// The patch mask, for patch mutations.
    pub fn field_mask(&self) -> Option<&FieldMask> {
        match &self.kind {
            MutationKind::Patch { mask, .. } => Some(mask),
            _ => None,
        }
    }

    /// Applies the mutation optimistically to `document`, ignoring the
    /// precondition, and returns the fields touched so far given the fields
    /// touched by earlier mutations.
    pub fn apply_to_local_view(
        &self,
        document: &mut MutableDocument,
        previous: TouchedFields,
        local_write_time: Timestamp,
    ) -> TouchedFields {
        self.verify_key_matches(document);
        let version = document.version();
        match &self.kind {
            MutationKind::Set { value } => {
                let transform_results = self.local_transform_results(document, local_write_time);
                let mut new_value = value.clone();
                new_value.set_all(transform_results);
                document
                    .convert_to_found_document(version, new_value)
                    .set_has_local_mutations();
                TouchedFields::All
            }
            MutationKind::Patch { data, mask } => {
                if mask.is_empty() && self.field_transforms.is_empty() {
                    return previous;
                }
                let transform_results = self.local_transform_results(document, local_write_time);
                let mut new_value = std::mem::take(document.data_mut());
                new_value.set_all(patch_entries(data, mask));
                new_value.set_all(transform_results);
                document
                    .convert_to_found_document(version, new_value)
                    .set_has_local_mutations();
                previous
                    .with_paths(mask.iter())
                    .with_paths(self.field_transform_paths())
            }
            MutationKind::Delete => {
                document
                    .convert_to_no_document(version)
                    .set_has_local_mutations();
                TouchedFields::All
            }
            MutationKind::Verify => previous,
            MutationKind::Transform => {
                if !document.is_found_document() || self.field_transforms.is_empty() {
                    return previous;
                }
                let transform_results = self.local_transform_results(document, local_write_time);
                document.data_mut().set_all(transform_results);
                document.set_has_local_mutations();
                previous.with_paths(self.field_transform_paths())
            }
        }
    }

    /// Applies the acknowledged mutation to `document`, producing the state the
    /// backend committed.
    pub fn apply_to_remote_document(
        &self,
        document: &mut MutableDocument,
        mutation_result: &MutationResult,
    ) {
        self.verify_key_matches(document);
        let version = mutation_result.version();
        match &self.kind {
            MutationKind::Set { value } => {
                let transform_results = self.server_transform_results(document, mutation_result);
                let mut new_value = value.clone();
                new_value.set_all(transform_results);
                document
                    .convert_to_found_document(version, new_value)
                    .set_has_committed_mutations();
            }
            MutationKind::Patch { data, mask } => {
                if !self.precondition.is_valid_for(document) {
                    document.convert_to_unknown_document(version);
                    return;
                }
                let transform_results = self.server_transform_results(document, mutation_result);
                let mut new_value = std::mem::take(document.data_mut());
                new_value.set_all(patch_entries(data, mask));
                new_value.set_all(transform_results);
                document
                    .convert_to_found_document(version, new_value)
                    .set_has_committed_mutations();
            }
            MutationKind::Delete => {
                hard_assert(
                    mutation_result.transform_results().is_empty(),
                    "Transform results received by a delete mutation",
                );
                document
                    .convert_to_no_document(version)
                    .set_has_committed_mutations();
            }
            MutationKind::Verify => {
                log::debug!("Verify mutation for {} acknowledged at {}", self.key, version);
            }
            MutationKind::Transform => {
                if !self.precondition.is_valid_for(document) {
                    document.convert_to_unknown_document(version);
                    return;
                }
                let transform_results = self.server_transform_results(document, mutation_result);
                let mut new_value = std::mem::take(document.data_mut());
                new_value.set_all(transform_results);
                document
                    .convert_to_found_document(version, new_value)
                    .set_has_committed_mutations();
            }
        }
    }

    /// The values an idempotent rewrite of this mutation's transforms would
    /// start from, or `None` when no transform has one.
    pub fn extract_transform_base_value(&self, document: &MutableDocument) -> Option<ObjectValue> {
        let mut base_object: Option<ObjectValue> = None;
        for transform in &self.field_transforms {
            let existing = document.field(transform.field_path());
            if let Some(base) = transform.operation().compute_base_value(existing) {
                base_object
                    .get_or_insert_with(ObjectValue::empty)
                    .set(transform.field_path(), base);
            }
        }
        base_object
    }

    fn verify_key_matches(&self, document: &MutableDocument) {
        hard_assert(
            document.key() == &self.key,
            format!(
                "Can only apply a mutation to a document with the same key ({} != {})",
                self.key,
                document.key()
            ),
        );
    }

    fn local_transform_results(
        &self,
        document: &MutableDocument,
        local_write_time: Timestamp,
    ) -> Vec<(FieldPath, Option<FirestoreValue>)> {
        self.field_transforms
            .iter()
            .map(|transform| {
                let previous = document.field(transform.field_path());
                let value = transform
                    .operation()
                    .apply_to_local_view(previous, local_write_time);
                (transform.field_path().clone(), Some(value))
            })
            .collect()
    }

    fn server_transform_results(
        &self,
        document: &MutableDocument,
        mutation_result: &MutationResult,
    ) -> Vec<(FieldPath, Option<FirestoreValue>)> {
        let server_results = mutation_result.transform_results();
        hard_assert(
            server_results.len() == self.field_transforms.len(),
            format!(
                "server transform count ({}) should match field transform count ({})",
                server_results.len(),
                self.field_transforms.len()
            ),
        );
        self.field_transforms
            .iter()
            .zip(server_results)
            .map(|(transform, server_result)| {
                let previous = document.field(transform.field_path());
                let value = transform
                    .operation()
                    .apply_to_remote_document(previous, server_result.clone());
                (transform.field_path().clone(), Some(value))
            })
            .collect()
    }
}

fn patch_entries(data: &ObjectValue, mask: &FieldMask) -> Vec<(FieldPath, Option<FirestoreValue>)> {
    mask.iter()
        .filter(|path| !path.is_empty())
        .map(|path| (path.clone(), data.get(path).cloned()))
        .collect()
}
