use alloc::string::String;
use core::any::Any;

use serde_json::{Map, Value};

use crate::info::{FieldDescriptor, FieldView, TypeCode};
use crate::json::scalar::{decode_scalar, kind_name};
use crate::json::trail::{Segment, Trail};
use crate::json::{FieldError, MarshalError};
use crate::registry::{RecordInfo, TypeRegistry};

// -----------------------------------------------------------------------------
// Decoder

/// Writes [`Value`] trees back into records.
///
/// Decoding is a partial update: fields missing from the input, or present
/// as `null`, keep their current value. Nothing is ever written outside a
/// field's storage:
///
/// - text is truncated so that the terminator still fits;
/// - arrays are filled up to the shorter of the input and their capacity;
/// - pointers are reset to null, functions are left alone.
///
/// A field whose value does not fit is left untouched and logged, the other
/// fields are still decoded.
///
/// # Example
///
/// ```
/// use mr_record::derive::Record;
/// use mr_record::json::Decoder;
/// use mr_record::registry::TypeRegistry;
///
/// #[derive(Record, Default)]
/// #[record(id = "Limits")]
/// struct Limits {
///     low: i16,
///     high: i16,
///     steps: [u8; 4],
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Limits>();
///
/// let mut limits = Limits { low: -5, high: 5, steps: [9; 4] };
/// let input = serde_json::json!({ "high": 10, "steps": [1, 2] });
/// Decoder::new(&registry).decode("Limits", &input, &mut limits).unwrap();
///
/// assert_eq!(limits.low, -5);
/// assert_eq!(limits.high, 10);
/// assert_eq!(limits.steps, [1, 2, 9, 9]);
/// ```
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Decoder<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Decodes `value` into `target` with the metadata registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`MarshalError::NotRegistered`] if `id` is unknown.
    /// - [`MarshalError::NotAnObject`] if `value` is not an object.
    /// - [`MarshalError::InstanceMismatch`] if `id` was registered for a Rust
    ///   type other than the one of `target`.
    ///
    /// `target` is untouched whenever an error is returned.
    pub fn decode(&self, id: &str, value: &Value, target: &mut dyn Any) -> Result<(), MarshalError> {
        let info = self
            .registry
            .lookup(id)
            .ok_or_else(|| MarshalError::NotRegistered { id: id.into() })?;

        let Value::Object(object) = value else {
            return Err(MarshalError::NotAnObject {
                record: id.into(),
                found: kind_name(value),
            });
        };

        if !info.accepts(target) {
            return Err(MarshalError::InstanceMismatch {
                record: id.into(),
                expected: info.type_name().unwrap_or_default(),
            });
        }

        let mut trail = Trail::new();
        self.decode_record(info, object, target, &mut trail);
        Ok(())
    }

    fn decode_record(
        &self,
        info: &'a RecordInfo,
        object: &Map<String, Value>,
        record: &mut dyn Any,
        trail: &mut Trail<'a>,
    ) {
        trail.scoped(Segment::Record(info.id()), |trail| {
            for field in info.fields() {
                let Some(value) = object.get(field.name()) else {
                    continue;
                };
                if value.is_null() {
                    continue;
                }
                trail.scoped(Segment::Field(field.name()), |trail| {
                    if let Err(err) = self.decode_field(field, value, record, trail) {
                        log::error!("failed to decode `{trail}`: {err}");
                    }
                });
            }
        });
    }

    fn decode_field(
        &self,
        field: &'a FieldDescriptor,
        value: &Value,
        record: &mut dyn Any,
        trail: &mut Trail<'a>,
    ) -> Result<(), FieldError> {
        match field.type_code() {
            TypeCode::Unknown | TypeCode::Function => Ok(()),
            TypeCode::Pointer => {
                let FieldView::Nullable { reset } = field.view() else {
                    return Err(FieldError::StorageMismatch(TypeCode::Pointer));
                };
                if reset(project_mut(field, record)?) {
                    Ok(())
                } else {
                    Err(FieldError::StorageMismatch(TypeCode::Pointer))
                }
            }
            code @ (TypeCode::I8
            | TypeCode::I16
            | TypeCode::I32
            | TypeCode::I64
            | TypeCode::U8
            | TypeCode::U16
            | TypeCode::U32
            | TypeCode::U64
            | TypeCode::F32
            | TypeCode::F64
            | TypeCode::Bool) => decode_scalar(code, value, project_mut(field, record)?),
            TypeCode::Text => {
                let Value::String(text) = value else {
                    return Err(FieldError::LeafMismatch {
                        expected: "a string",
                        found: kind_name(value),
                    });
                };
                let FieldView::Bytes { bytes_mut, .. } = field.view() else {
                    return Err(FieldError::StorageMismatch(TypeCode::Text));
                };
                let buffer = bytes_mut(project_mut(field, record)?)
                    .ok_or(FieldError::StorageMismatch(TypeCode::Text))?;
                write_text(buffer, field.size(), text.as_bytes());
                Ok(())
            }
            TypeCode::Record => {
                let Some(info) = self.nested(field) else {
                    log::debug!("skipped `{trail}`: nested record is not registered");
                    return Ok(());
                };
                let Value::Object(object) = value else {
                    return Err(FieldError::LeafMismatch {
                        expected: "an object",
                        found: kind_name(value),
                    });
                };
                let nested = project_mut(field, record)?;
                check_instance(info, nested)?;
                self.decode_record(info, object, nested, trail);
                Ok(())
            }
            TypeCode::Array => self.decode_array(field, value, record, trail),
        }
    }

    fn decode_array(
        &self,
        field: &'a FieldDescriptor,
        value: &Value,
        record: &mut dyn Any,
        trail: &mut Trail<'a>,
    ) -> Result<(), FieldError> {
        let Value::Array(items) = value else {
            log::debug!("skipped `{trail}`: expected an array, found {}", kind_name(value));
            return Ok(());
        };

        let element_code = field.element_type_code();
        let nested = match element_code {
            TypeCode::Record => match self.nested(field) {
                Some(info) => Some(info),
                None => {
                    log::warn!("skipped `{trail}`: element record is not registered");
                    return Ok(());
                }
            },
            code if code.is_scalar() => None,
            code => {
                log::warn!("skipped `{trail}`: unsupported element type `{code}`");
                return Ok(());
            }
        };

        let FieldView::Elements { element_mut, .. } = field.view() else {
            return Err(FieldError::StorageMismatch(TypeCode::Array));
        };
        let storage = project_mut(field, record)?;

        let count = items.len().min(field.capacity());
        for (index, item) in items.iter().enumerate().take(count) {
            let slot = element_mut(&mut *storage, index).ok_or(FieldError::OutOfBounds { index })?;
            match nested {
                Some(info) => {
                    let Value::Object(object) = item else {
                        log::debug!(
                            "skipped `{trail}[{index}]`: expected an object, found {}",
                            kind_name(item)
                        );
                        continue;
                    };
                    check_instance(info, slot)?;
                    trail.scoped(Segment::Index(index), |trail| {
                        self.decode_record(info, object, slot, trail);
                    });
                }
                None => {
                    if let Err(err) = decode_scalar(element_code, item, slot) {
                        log::debug!("skipped `{trail}[{index}]`: {err}");
                    }
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn nested(&self, field: &FieldDescriptor) -> Option<&'a RecordInfo> {
        field
            .nested_type_id()
            .and_then(|id| self.registry.lookup(id))
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn project_mut<'r>(
    field: &FieldDescriptor,
    record: &'r mut dyn Any,
) -> Result<&'r mut dyn Any, FieldError> {
    field
        .access()
        .and_then(|access| access.get_mut(record))
        .ok_or(FieldError::Unreachable)
}

fn check_instance(info: &RecordInfo, instance: &dyn Any) -> Result<(), FieldError> {
    if info.accepts(instance) {
        Ok(())
    } else {
        Err(FieldError::RecordMismatch {
            record: info.id().into(),
        })
    }
}

/// Copies `text` into a zero-terminated buffer.
///
/// At most `size` bytes of `buffer` are used (the whole buffer when `size` is
/// 0). The copy is truncated to leave room for the terminator and every byte
/// after the copied text, up to that limit, is zeroed.
fn write_text(buffer: &mut [u8], size: usize, text: &[u8]) {
    let limit = match size {
        0 => buffer.len(),
        size => size.min(buffer.len()),
    };
    let Some(room) = limit.checked_sub(1) else {
        return;
    };
    let copied = text.len().min(room);
    let (head, tail) = buffer[..limit].split_at_mut(copied);
    head.copy_from_slice(&text[..copied]);
    tail.fill(0);
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::write_text;

    #[test]
    fn text_is_truncated_and_terminated() {
        let mut buffer = [b'x'; 8];
        write_text(&mut buffer, 8, b"Toyota Corolla");
        assert_eq!(&buffer, b"Toyota \0");

        write_text(&mut buffer, 8, b"VW");
        assert_eq!(&buffer, b"VW\0\0\0\0\0\0");
    }

    #[test]
    fn text_respects_declared_size() {
        let mut buffer = [b'x'; 8];
        write_text(&mut buffer, 4, b"abcdef");
        assert_eq!(&buffer, b"abc\0xxxx");

        let mut buffer = [b'x'; 4];
        write_text(&mut buffer, 0, b"abcdef");
        assert_eq!(&buffer, b"abc\0");

        // a declared size larger than the storage is clamped
        let mut buffer = [b'x'; 3];
        write_text(&mut buffer, 64, b"abcdef");
        assert_eq!(&buffer, b"ab\0");

        let mut empty: [u8; 0] = [];
        write_text(&mut empty, 0, b"abc");
    }
}
