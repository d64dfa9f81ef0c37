mod array_value;
mod bytes_value;
mod map_value;
mod reference_value;
mod server_timestamp;
mod value;
pub mod values;

pub use array_value::ArrayValue;
pub use bytes_value::BytesValue;
pub use map_value::MapValue;
pub use reference_value::ReferenceValue;
pub use server_timestamp::ServerTimestampValue;
pub use value::{FirestoreValue, ValueKind};
