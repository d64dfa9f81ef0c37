use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use crate::model::FieldPath;

/// The set of field paths a write touches. A path covers all of its
/// descendants, so `a` in the mask also covers `a.b`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldMask {
    paths: BTreeSet<FieldPath>,
}

impl FieldMask {
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = FieldPath>,
    {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &BTreeSet<FieldPath> {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.paths.contains(path)
    }

    /// Whether `path` is in the mask or is a descendant of an entry.
    pub fn covers(&self, path: &FieldPath) -> bool {
        self.paths.iter().any(|entry| entry.is_prefix_of(path))
    }

    pub fn insert(&mut self, path: FieldPath) {
        self.paths.insert(path);
    }

    pub fn union(&self, other: &FieldMask) -> FieldMask {
        Self {
            paths: self.paths.union(&other.paths).cloned().collect(),
        }
    }
}

impl FromIterator<FieldPath> for FieldMask {
    fn from_iter<T: IntoIterator<Item = FieldPath>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl Display for FieldMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.paths.iter().map(FieldPath::canonical_string).collect();
        write!(f, "FieldMask{{mask=[{}]}}", rendered.join(", "))
    }
}
