use alloc::string::String;
use core::any::Any;

use serde_json::Value;

use crate::json::{Decoder, Encoder, MarshalError};
use crate::registry::{Record, TypeRegistry};

// -----------------------------------------------------------------------------
// Typed API

/// Encodes `record` into a [`Value`].
///
/// See [`Encoder::encode`].
#[inline]
pub fn to_value<T: Record>(registry: &TypeRegistry, record: &T) -> Result<Value, MarshalError> {
    Encoder::new(registry).encode(T::record_id(), record)
}

/// Decodes `value` into `record`.
///
/// See [`Decoder::decode`].
#[inline]
pub fn from_value<T: Record>(
    registry: &TypeRegistry,
    value: &Value,
    record: &mut T,
) -> Result<(), MarshalError> {
    Decoder::new(registry).decode(T::record_id(), value, record)
}

/// Encodes `record` into compact JSON text.
pub fn to_string<T: Record>(registry: &TypeRegistry, record: &T) -> Result<String, MarshalError> {
    encode_to_string(registry, T::record_id(), record)
}

/// Encodes `record` into indented JSON text.
pub fn to_string_pretty<T: Record>(
    registry: &TypeRegistry,
    record: &T,
) -> Result<String, MarshalError> {
    let value = to_value(registry, record)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Decodes JSON text into `record`.
///
/// # Errors
///
/// Besides the errors of [`Decoder::decode`], returns
/// [`MarshalError::EmptyInput`] for empty (or blank) text and
/// [`MarshalError::Json`] for text that is not valid JSON.
pub fn from_str<T: Record>(
    registry: &TypeRegistry,
    text: &str,
    record: &mut T,
) -> Result<(), MarshalError> {
    decode_from_str(registry, T::record_id(), text, record)
}

// -----------------------------------------------------------------------------
// Untyped API

/// Encodes `instance` with the metadata registered under `id` into compact
/// JSON text.
pub fn encode_to_string(
    registry: &TypeRegistry,
    id: &str,
    instance: &dyn Any,
) -> Result<String, MarshalError> {
    let value = Encoder::new(registry).encode(id, instance)?;
    Ok(serde_json::to_string(&value)?)
}

/// Decodes JSON text into `target` with the metadata registered under `id`.
pub fn decode_from_str(
    registry: &TypeRegistry,
    id: &str,
    text: &str,
    target: &mut dyn Any,
) -> Result<(), MarshalError> {
    if text.trim().is_empty() {
        return Err(MarshalError::EmptyInput);
    }
    let value: Value = serde_json::from_str(text)?;
    Decoder::new(registry).decode(id, &value, target)
}
