use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::error::{invalid_argument, FirestoreResult};
use crate::util::compare_utf16;

const DOCUMENT_KEY_NAME: &str = "__name__";

/// A dot-separated path to a field inside a document, e.g. `address.city`.
///
/// Only [`FieldPath::empty`] has zero segments; it addresses the root of a
/// document and never appears in a field mask.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Builds a path from user-supplied segments, rejecting empty input.
    pub fn new<S, I>(segments: I) -> FirestoreResult<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(invalid_argument(
                "FieldPath must contain at least one segment",
            ));
        }
        if segments.iter().any(String::is_empty) {
            return Err(invalid_argument("FieldPath segments must not be empty"));
        }
        Ok(Self { segments })
    }

    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub(crate) fn from_segments_unchecked(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn from_single_segment(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// Splits a user path on `.`; no escaping is applied.
    pub fn from_dot_separated(path: &str) -> FirestoreResult<Self> {
        if path.is_empty() || path.split('.').any(str::is_empty) {
            return Err(invalid_argument(format!(
                "Invalid field path ({path}). Paths must not be empty, begin with '.', end with '.', or contain '..'"
            )));
        }
        Ok(Self::from_segments_unchecked(
            path.split('.').map(str::to_string).collect(),
        ))
    }

    /// Parses the server representation where segments may be wrapped in
    /// backticks and `\` escapes the next character.
    pub fn from_server_format(path: &str) -> FirestoreResult<Self> {
        let empty_segment = || {
            invalid_argument(format!(
                "Invalid field path ({path}). Paths must not be empty, begin with '.', end with '.', or contain '..'"
            ))
        };

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut in_backticks = false;
        let mut chars = path.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => {
                        return Err(invalid_argument(
                            "Trailing escape character is not allowed",
                        ))
                    }
                },
                '.' if !in_backticks => {
                    if current.is_empty() {
                        return Err(empty_segment());
                    }
                    segments.push(std::mem::take(&mut current));
                }
                '`' => in_backticks = !in_backticks,
                other => current.push(other),
            }
        }

        if current.is_empty() {
            return Err(empty_segment());
        }
        segments.push(current);

        if in_backticks {
            return Err(invalid_argument(format!("Unterminated ` in path {path}")));
        }

        Ok(Self { segments })
    }

    /// The reserved path that refers to a document's key.
    pub fn key_path() -> Self {
        Self::from_single_segment(DOCUMENT_KEY_NAME)
    }

    pub fn is_key_field(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == DOCUMENT_KEY_NAME
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    pub fn first_segment(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn append(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    pub fn append_path(&self, other: &FieldPath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    pub fn pop_first(&self) -> Self {
        Self {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }

    pub fn pop_last(&self) -> Self {
        let keep = self.segments.len().saturating_sub(1);
        self.keep_first(keep)
    }

    pub fn keep_first(&self, count: usize) -> Self {
        Self {
            segments: self.segments.iter().take(count).cloned().collect(),
        }
    }

    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        self.len() <= other.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(l, r)| l == r)
    }

    pub fn is_immediate_parent_of(&self, other: &FieldPath) -> bool {
        self.len() + 1 == other.len() && self.is_prefix_of(other)
    }

    /// Renders the path in server format, quoting segments that are not plain
    /// identifiers.
    pub fn canonical_string(&self) -> String {
        self.segments
            .iter()
            .map(|segment| escape_segment(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.segments.clone()
    }
}

fn is_valid_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn escape_segment(segment: &str) -> String {
    if is_valid_identifier(segment) {
        return segment.to_string();
    }
    let escaped = segment.replace('\\', "\\\\").replace('`', "\\`");
    format!("`{escaped}`")
}

impl Ord for FieldPath {
    fn cmp(&self, other: &Self) -> Ordering {
        for (l, r) in self.segments.iter().zip(other.segments.iter()) {
            match compare_utf16(l, r) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        self.len().cmp(&other.len())
    }
}

impl PartialOrd for FieldPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}

/// Trait that converts common user inputs into a validated [`FieldPath`].
pub trait IntoFieldPath {
    fn into_field_path(self) -> FirestoreResult<FieldPath>;
}

impl IntoFieldPath for FieldPath {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        Ok(self)
    }
}

impl<'a> IntoFieldPath for &'a FieldPath {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        Ok(self.clone())
    }
}

impl IntoFieldPath for String {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        FieldPath::from_dot_separated(&self)
    }
}

impl<'a> IntoFieldPath for &'a str {
    fn into_field_path(self) -> FirestoreResult<FieldPath> {
        FieldPath::from_dot_separated(self)
    }
}
