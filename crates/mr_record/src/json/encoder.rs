use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use serde_json::{Map, Value};

use crate::info::{FieldDescriptor, FieldView, TypeCode};
use crate::json::placeholder;
use crate::json::scalar::encode_scalar;
use crate::json::trail::{Segment, Trail};
use crate::json::{FieldError, MarshalError};
use crate::registry::{RecordInfo, TypeRegistry};

/// Bytes scanned from a text field that declares no size.
const DEFAULT_TEXT_SCAN: usize = 256;

// -----------------------------------------------------------------------------
// Encoder

/// Converts records into [`Value`] trees.
///
/// The output is always an object with one entry per descriptor, in
/// descriptor order. A field that cannot be encoded becomes
/// [`placeholder::ERROR`] and the remaining fields are still processed.
///
/// # Example
///
/// ```
/// use mr_record::derive::Record;
/// use mr_record::json::Encoder;
/// use mr_record::registry::TypeRegistry;
///
/// #[derive(Record)]
/// #[record(id = "Probe")]
/// struct Probe {
///     channel: u8,
///     #[record(pointer)]
///     device: *const u8,
///     #[record(function)]
///     on_sample: fn(f32),
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Probe>();
///
/// let probe = Probe { channel: 3, device: core::ptr::null(), on_sample: |_| {} };
/// let value = Encoder::new(&registry).encode("Probe", &probe).unwrap();
///
/// assert_eq!(value, serde_json::json!({
///     "channel": 3,
///     "device": "[pointer]",
///     "on_sample": "[function_pointer]",
/// }));
/// ```
#[derive(Clone, Copy)]
pub struct Encoder<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> Encoder<'a> {
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Encodes `instance` with the metadata registered under `id`.
    ///
    /// # Errors
    ///
    /// - [`MarshalError::NotRegistered`] if `id` is unknown.
    /// - [`MarshalError::InstanceMismatch`] if `id` was registered for a Rust
    ///   type other than the one of `instance`.
    pub fn encode(&self, id: &str, instance: &dyn Any) -> Result<Value, MarshalError> {
        let info = self
            .registry
            .lookup(id)
            .ok_or_else(|| MarshalError::NotRegistered { id: id.into() })?;

        if !info.accepts(instance) {
            return Err(MarshalError::InstanceMismatch {
                record: id.into(),
                expected: info.type_name().unwrap_or_default(),
            });
        }

        let mut trail = Trail::new();
        Ok(Value::Object(self.encode_record(info, instance, &mut trail)))
    }

    fn encode_record(
        &self,
        info: &'a RecordInfo,
        record: &dyn Any,
        trail: &mut Trail<'a>,
    ) -> Map<String, Value> {
        trail.scoped(Segment::Record(info.id()), |trail| {
            let mut object = Map::new();
            for field in info.fields() {
                if field.type_code() == TypeCode::Array && object.contains_key(field.name()) {
                    continue;
                }
                let value = trail.scoped(Segment::Field(field.name()), |trail| {
                    self.encode_field(field, record, trail)
                        .unwrap_or_else(|err| {
                            log::error!("failed to encode `{trail}`: {err}");
                            Value::from(placeholder::ERROR)
                        })
                });
                object.insert(field.name().into(), value);
            }
            object
        })
    }

    fn encode_field(
        &self,
        field: &'a FieldDescriptor,
        record: &dyn Any,
        trail: &mut Trail<'a>,
    ) -> Result<Value, FieldError> {
        match field.type_code() {
            TypeCode::Unknown => Ok(Value::from(placeholder::UNKNOWN_TYPE)),
            TypeCode::Function => Ok(Value::from(placeholder::FUNCTION)),
            TypeCode::Pointer => Ok(Value::from(placeholder::POINTER)),
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
            | TypeCode::Bool) => encode_scalar(code, project(field, record)?),
            TypeCode::Text => {
                let FieldView::Bytes { bytes, .. } = field.view() else {
                    return Err(FieldError::StorageMismatch(TypeCode::Text));
                };
                let bytes = bytes(project(field, record)?)
                    .ok_or(FieldError::StorageMismatch(TypeCode::Text))?;
                Ok(Value::String(scan_text(bytes, field.size())))
            }
            TypeCode::Record => {
                let Some(info) = self.nested(field) else {
                    return Ok(Value::from(placeholder::STRUCT));
                };
                let nested = project(field, record)?;
                check_instance(info, nested)?;
                Ok(Value::Object(self.encode_record(info, nested, trail)))
            }
            TypeCode::Array => self.encode_array(field, record, trail),
        }
    }

    fn encode_array(
        &self,
        field: &'a FieldDescriptor,
        record: &dyn Any,
        trail: &mut Trail<'a>,
    ) -> Result<Value, FieldError> {
        let element_code = field.element_type_code();
        let nested = match element_code {
            TypeCode::Record => match self.nested(field) {
                Some(info) => Some(info),
                None => return Ok(unknown_array()),
            },
            code if code.is_scalar() => None,
            _ => return Ok(unknown_array()),
        };

        let FieldView::Elements { element, .. } = field.view() else {
            return Err(FieldError::StorageMismatch(TypeCode::Array));
        };
        let storage = project(field, record)?;

        let count = field.capacity();
        let mut items = Vec::with_capacity(count);
        for index in 0..count {
            let item = element(storage, index).ok_or(FieldError::OutOfBounds { index })?;
            let value = match nested {
                Some(info) => {
                    check_instance(info, item)?;
                    let object = trail.scoped(Segment::Index(index), |trail| {
                        self.encode_record(info, item, trail)
                    });
                    Value::Object(object)
                }
                None => encode_scalar(element_code, item)?,
            };
            items.push(value);
        }
        Ok(Value::Array(items))
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

fn project<'r>(field: &FieldDescriptor, record: &'r dyn Any) -> Result<&'r dyn Any, FieldError> {
    field
        .access()
        .and_then(|access| access.get(record))
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

fn unknown_array() -> Value {
    Value::Array(alloc::vec![Value::from(placeholder::UNKNOWN_ARRAY_TYPE)])
}

/// Reads zero-terminated text, keeping ASCII only.
///
/// At most `size` bytes are scanned, or [`DEFAULT_TEXT_SCAN`] when `size` is 0.
fn scan_text(bytes: &[u8], size: usize) -> String {
    let limit = if size == 0 { DEFAULT_TEXT_SCAN } else { size };
    bytes
        .iter()
        .take(limit)
        .take_while(|&&byte| byte != 0)
        .filter(|byte| byte.is_ascii())
        .map(|&byte| char::from(byte))
        .collect()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::scan_text;

    #[test]
    fn text_scan_stops_at_terminator() {
        assert_eq!(scan_text(b"Toyota\0junk", 32), "Toyota");
        assert_eq!(scan_text(b"abcdef", 3), "abc");
        assert_eq!(scan_text(b"abc", 0), "abc");
        assert_eq!(scan_text(b"\0abc", 4), "");
    }

    #[test]
    fn text_scan_drops_non_ascii() {
        assert_eq!(scan_text(&[b'c', 0xC3, 0xA9, b'z', 0], 8), "cz");
    }
}
