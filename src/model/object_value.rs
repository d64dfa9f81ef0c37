use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::model::{FieldMask, FieldPath};
use crate::util::hard_assert;
use crate::value::{values, FirestoreValue, MapValue, ValueKind};

/// The data of a document: a map-rooted value addressed by [`FieldPath`].
///
/// `ObjectValue` is a plain value type. Edits go through `&mut self`, so a
/// caller that needs a stable snapshot clones first and edits the copy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectValue {
    fields: MapValue,
}

impl ObjectValue {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> ObjectValueBuilder {
        ObjectValueBuilder::default()
    }

    /// A builder seeded with a copy of this value; `self` is left untouched.
    pub fn to_builder(&self) -> ObjectValueBuilder {
        ObjectValueBuilder {
            value: self.clone(),
        }
    }

    pub fn from_map(fields: BTreeMap<String, FirestoreValue>) -> Self {
        Self {
            fields: MapValue::new(fields),
        }
    }

    /// Wraps a map value. Returns `None` when `value` is not a map.
    pub fn from_value(value: FirestoreValue) -> Option<Self> {
        match value.into_kind() {
            ValueKind::Map(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn fields(&self) -> &BTreeMap<String, FirestoreValue> {
        self.fields.fields()
    }

    pub fn to_value(&self) -> FirestoreValue {
        FirestoreValue::from_kind(ValueKind::Map(self.fields.clone()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads the value at `path`; `None` when any segment is missing or an
    /// intermediate value is not a map. The empty path is not addressable.
    pub fn get(&self, path: &FieldPath) -> Option<&FirestoreValue> {
        let (last, parents) = path.segments().split_last()?;
        let mut current = &self.fields;
        for segment in parents {
            current = current.get(segment)?.as_map()?;
        }
        current.get(last)
    }

    /// Writes `value` at `path`, replacing any non-map value found on the way
    /// with an empty map.
    pub fn set(&mut self, path: &FieldPath, value: FirestoreValue) {
        hard_assert(!path.is_empty(), "Cannot set field for empty path on ObjectValue");
        set_at_segments(self.fields.fields_mut(), path.segments(), value);
    }

    /// Applies a batch of writes; `None` deletes the path.
    pub fn set_all<I>(&mut self, data: I)
    where
        I: IntoIterator<Item = (FieldPath, Option<FirestoreValue>)>,
    {
        for (path, value) in data {
            match value {
                Some(value) => self.set(&path, value),
                None => self.delete(&path),
            }
        }
    }

    /// Removes the value at `path`. Maps left empty by the removal are removed
    /// from their parents as well, up to but excluding the root.
    pub fn delete(&mut self, path: &FieldPath) {
        hard_assert(!path.is_empty(), "Cannot delete field for empty path on ObjectValue");
        delete_at_segments(self.fields.fields_mut(), path.segments());
    }

    /// Every leaf path in the object. An empty nested map counts as a leaf.
    pub fn field_mask(&self) -> FieldMask {
        let mut mask = FieldMask::empty();
        collect_leaf_paths(&self.fields, &FieldPath::empty(), &mut mask);
        mask
    }
}

fn set_at_segments(
    fields: &mut BTreeMap<String, FirestoreValue>,
    segments: &[String],
    value: FirestoreValue,
) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        fields.insert(first.clone(), value);
        return;
    }

    let entry = fields
        .entry(first.clone())
        .or_insert_with(FirestoreValue::empty_map);
    if !entry.is_map() {
        *entry = FirestoreValue::empty_map();
    }
    if let Some(child) = entry.as_map_mut() {
        set_at_segments(child.fields_mut(), rest, value);
    }
}

/// Returns whether a value was removed.
fn delete_at_segments(fields: &mut BTreeMap<String, FirestoreValue>, segments: &[String]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };

    if rest.is_empty() {
        return fields.remove(first).is_some();
    }

    let Some(child) = fields.get_mut(first).and_then(FirestoreValue::as_map_mut) else {
        return false;
    };
    let removed = delete_at_segments(child.fields_mut(), rest);
    if removed && child.is_empty() {
        fields.remove(first);
    }
    removed
}

fn collect_leaf_paths(map: &MapValue, prefix: &FieldPath, mask: &mut FieldMask) {
    for (key, value) in map.fields() {
        let path = prefix.append(key.clone());
        match value.as_map() {
            Some(child) if !child.is_empty() => collect_leaf_paths(child, &path, mask),
            _ => mask.insert(path),
        }
    }
}

impl From<BTreeMap<String, FirestoreValue>> for ObjectValue {
    fn from(fields: BTreeMap<String, FirestoreValue>) -> Self {
        Self::from_map(fields)
    }
}

impl Display for ObjectValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", values::canonical_id(&self.to_value()))
    }
}

/// Collects field writes and produces an [`ObjectValue`] in one step.
#[derive(Clone, Debug, Default)]
pub struct ObjectValueBuilder {
    value: ObjectValue,
}

impl ObjectValueBuilder {
    pub fn set(mut self, path: &FieldPath, value: FirestoreValue) -> Self {
        self.value.set(path, value);
        self
    }

    pub fn delete(mut self, path: &FieldPath) -> Self {
        self.value.delete(path);
        self
    }

    pub fn build(self) -> ObjectValue {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn path(value: &str) -> FieldPath {
        FieldPath::from_dot_separated(value).unwrap()
    }

    fn int(value: i64) -> FirestoreValue {
        FirestoreValue::from_integer(value)
    }

    #[test]
    fn get_missing_and_non_map_paths() {
        let mut object = ObjectValue::empty();
        object.set(&path("a"), int(1));
        assert_eq!(object.get(&path("a")), Some(&int(1)));
        assert_eq!(object.get(&path("b")), None);
        assert_eq!(object.get(&path("a.b")), None);
    }

    #[test]
    fn builder_leaves_source_untouched() {
        let original = ObjectValue::builder()
            .set(&path("a.b"), int(1))
            .set(&path("c"), int(2))
            .build();

        let edited = original
            .to_builder()
            .delete(&path("a.b"))
            .set(&path("d"), int(3))
            .build();

        assert_eq!(original.get(&path("a.b")), Some(&int(1)));
        assert_eq!(original.get(&path("d")), None);
        assert_eq!(edited.field_mask(), FieldMask::new([path("c"), path("d")]));
    }

    #[test]
    fn set_creates_intermediate_maps() {
        let mut object = ObjectValue::empty();
        object.set(&path("a.b.c"), int(1));
        assert_eq!(object.get(&path("a.b.c")), Some(&int(1)));
        assert!(object.get(&path("a.b")).unwrap().is_map());
    }

    #[test]
    fn set_overwrites_non_map_parent() {
        let mut object = ObjectValue::empty();
        object.set(&path("a"), int(1));
        object.set(&path("a.b"), int(2));
        assert_eq!(object.get(&path("a.b")), Some(&int(2)));
        assert_eq!(object.field_mask(), FieldMask::new([path("a.b")]));
    }

    #[test]
    fn delete_prunes_empty_parents() {
        let mut object = ObjectValue::empty();
        object.set(&path("a.b"), int(1));
        object.set(&path("a.c"), int(2));
        object.delete(&path("a.b"));
        assert!(object.get(&path("a")).is_some());
        object.delete(&path("a.c"));
        assert_eq!(object.get(&path("a")), None);
        assert!(object.is_empty());
    }

    #[test]
    fn delete_cascades_but_keeps_root() {
        let mut object = ObjectValue::empty();
        object.set(&path("a.b.c"), int(1));
        object.delete(&path("a.b.c"));
        assert!(object.is_empty());
        assert_eq!(object, ObjectValue::empty());
    }

    #[test]
    fn delete_of_missing_path_keeps_existing_empty_map() {
        let mut object = ObjectValue::empty();
        object.set(&path("a"), FirestoreValue::empty_map());
        object.delete(&path("a.b"));
        assert_eq!(object.get(&path("a")), Some(&FirestoreValue::empty_map()));
    }

    #[test]
    fn field_mask_treats_empty_map_as_leaf() {
        let mut object = ObjectValue::empty();
        object.set(&path("a"), FirestoreValue::empty_map());
        object.set(&path("b.c"), int(1));
        object.set(&path("b.d"), int(2));
        assert_eq!(
            object.field_mask(),
            FieldMask::new([path("a"), path("b.c"), path("b.d")])
        );
    }

    #[test]
    fn set_all_deletes_missing_values() {
        let mut object = ObjectValue::empty();
        object.set(&path("a"), int(1));
        object.set_all([(path("a"), None), (path("b"), Some(int(2)))]);
        assert_eq!(object.get(&path("a")), None);
        assert_eq!(object.get(&path("b")), Some(&int(2)));
    }

    fn arb_path() -> impl Strategy<Value = FieldPath> {
        prop::collection::vec("[a-c]", 1..4)
            .prop_map(|segments| FieldPath::new(segments).unwrap())
    }

    proptest! {
        #[test]
        fn set_then_get_round_trips(
            setup in prop::collection::vec((arb_path(), any::<i64>()), 0..6),
            target in arb_path(),
            value in any::<i64>(),
        ) {
            let mut object = ObjectValue::empty();
            for (path, seed) in &setup {
                object.set(path, int(*seed));
            }
            object.set(&target, int(value));
            prop_assert_eq!(object.get(&target), Some(&int(value)));

            object.delete(&target);
            prop_assert_eq!(object.get(&target), None);
        }

        #[test]
        fn deleting_every_leaf_empties_the_object(
            setup in prop::collection::vec((arb_path(), any::<i64>()), 0..6),
        ) {
            let mut object = ObjectValue::empty();
            for (path, seed) in &setup {
                object.set(path, int(*seed));
            }
            let leaves: Vec<FieldPath> = object.field_mask().iter().cloned().collect();
            for path in &leaves {
                object.delete(path);
            }
            prop_assert!(object.is_empty());
        }
    }
}
