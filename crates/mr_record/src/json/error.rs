use alloc::string::String;

use thiserror::Error;

use crate::info::TypeCode;

// -----------------------------------------------------------------------------
// MarshalError

/// A failure of a whole encode or decode call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MarshalError {
    /// The record id has no metadata in the registry.
    #[error("record `{id}` is not registered")]
    NotRegistered { id: String },
    /// The instance is not of the Rust type registered for the id.
    #[error("record `{record}` is registered for `{expected}`, got another type")]
    InstanceMismatch {
        record: String,
        expected: &'static str,
    },
    /// Decoding requires an object at the top level.
    #[error("record `{record}` must be decoded from an object, found {found}")]
    NotAnObject { record: String, found: &'static str },
    /// Text input was empty.
    #[error("cannot decode a record from empty text")]
    EmptyInput,
    #[error("invalid JSON text: {0}")]
    Json(#[from] serde_json::Error),
}

// -----------------------------------------------------------------------------
// FieldError

/// A failure contained to a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FieldError {
    /// The descriptor has no accessor, or its accessor belongs to another
    /// record type.
    #[error("field storage is not reachable from this record")]
    Unreachable,
    /// The projected storage is not of the type the type code implies.
    #[error("field storage does not hold a value of kind `{0}`")]
    StorageMismatch(TypeCode),
    /// An array index past the end of the storage.
    #[error("index {index} is out of bounds")]
    OutOfBounds { index: usize },
    /// A nested record whose storage is not the registered Rust type.
    #[error("nested storage is not an instance of record `{record}`")]
    RecordMismatch { record: String },
    /// The JSON value has the wrong kind for the field.
    #[error("expected {expected}, found {found}")]
    LeafMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// An integer that does not fit the field.
    #[error("{value} does not fit in `{code}`")]
    Overflow { code: TypeCode, value: String },
}
