use std::hash::{Hash, Hasher};

use crate::model::Timestamp;
use crate::value::{FirestoreValue, ValueKind};

/// The local stand-in for `FieldValue.serverTimestamp()` until the write is
/// acknowledged.
///
/// Two pending timestamps are equal when they were written at the same local
/// time; the previous value is only used for display.
#[derive(Clone, Debug)]
pub struct ServerTimestampValue {
    local_write_time: Timestamp,
    previous_value: Option<Box<FirestoreValue>>,
}

impl ServerTimestampValue {
    pub fn new(local_write_time: Timestamp, previous: Option<&FirestoreValue>) -> Self {
        let previous_value = previous.and_then(|value| match value.kind() {
            ValueKind::ServerTimestamp(pending) => pending.previous_value.clone(),
            _ => Some(Box::new(value.clone())),
        });
        Self {
            local_write_time,
            previous_value,
        }
    }

    pub fn local_write_time(&self) -> Timestamp {
        self.local_write_time
    }

    pub fn previous_value(&self) -> Option<&FirestoreValue> {
        self.previous_value.as_deref()
    }
}

impl PartialEq for ServerTimestampValue {
    fn eq(&self, other: &Self) -> bool {
        self.local_write_time == other.local_write_time
    }
}

impl Eq for ServerTimestampValue {}

impl Hash for ServerTimestampValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.local_write_time.hash(state);
    }
}
