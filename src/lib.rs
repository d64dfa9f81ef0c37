//! Local write and index model for a Firestore-compatible client cache.
//!
//! The crate holds the pieces of the client that decide what a document looks
//! like while writes are pending and which client-side index can answer a
//! query:
//!
//! - [`model::mutation`]: set, patch, delete, verify and transform mutations,
//!   their optimistic and acknowledged application, and squashing of pending
//!   mutations into one overlay per document.
//! - [`model::TargetIndexMatcher`]: decides whether a [`model::FieldIndex`]
//!   serves a [`core::Target`] and builds a serving index.
//! - [`local`]: in-memory index manager, remote document and overlay caches,
//!   and the local documents view that combines them.
//!
//! ```
//! use firestore_local_rs::model::mutation::{squash, Mutation};
//! use firestore_local_rs::model::{
//!     DocumentKey, FieldMask, FieldPath, MutableDocument, ObjectValue, SnapshotVersion, Timestamp,
//! };
//! use firestore_local_rs::value::FirestoreValue;
//!
//! let key = DocumentKey::from_string("rooms/eros").unwrap();
//! let base = MutableDocument::new_no_document(key.clone(), SnapshotVersion::none());
//!
//! let mut data = ObjectValue::empty();
//! data.set(&FieldPath::from_single_segment("topic"), FirestoreValue::from_string("rust"));
//! let mutations = [
//!     Mutation::set(key.clone(), ObjectValue::empty()),
//!     Mutation::merge(key, data.clone(), FieldMask::new([FieldPath::from_single_segment("topic")])),
//! ];
//!
//! let squashed = squash(&base, &mutations, Timestamp::now()).unwrap();
//! assert_eq!(squashed, Mutation::set(base.key().clone(), data));
//! ```

pub mod core;
pub mod error;
pub mod local;
pub mod model;
pub mod util;
pub mod value;
