use alloc::string::ToString;
use core::any::Any;

use serde_json::Value;

use crate::info::TypeCode;
use crate::json::FieldError;

/// Reads a `T` out of type-erased storage.
#[inline]
fn read<T: Any + Copy>(code: TypeCode, storage: &dyn Any) -> Result<T, FieldError> {
    storage
        .downcast_ref::<T>()
        .copied()
        .ok_or(FieldError::StorageMismatch(code))
}

#[inline]
fn slot<T: Any>(code: TypeCode, storage: &mut dyn Any) -> Result<&mut T, FieldError> {
    storage
        .downcast_mut::<T>()
        .ok_or(FieldError::StorageMismatch(code))
}

/// The JSON kind of `value`, for diagnostics.
pub(super) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Builds the leaf for a scalar field.
///
/// `I8` is emitted as its unsigned byte. `F32` is written in its shortest
/// decimal form. Non-finite floats become `null`.
pub(super) fn encode_scalar(code: TypeCode, storage: &dyn Any) -> Result<Value, FieldError> {
    let value = match code {
        TypeCode::I8 => Value::from(read::<i8>(code, storage)?.to_ne_bytes()[0]),
        TypeCode::I16 => Value::from(read::<i16>(code, storage)?),
        TypeCode::I32 => Value::from(read::<i32>(code, storage)?),
        TypeCode::I64 => Value::from(read::<i64>(code, storage)?),
        TypeCode::U8 => Value::from(read::<u8>(code, storage)?),
        TypeCode::U16 => Value::from(read::<u16>(code, storage)?),
        TypeCode::U32 => Value::from(read::<u32>(code, storage)?),
        TypeCode::U64 => Value::from(read::<u64>(code, storage)?),
        TypeCode::F32 => Value::from(widen(read::<f32>(code, storage)?)),
        TypeCode::F64 => Value::from(read::<f64>(code, storage)?),
        TypeCode::Bool => Value::Bool(read::<bool>(code, storage)?),
        _ => return Err(FieldError::StorageMismatch(code)),
    };
    Ok(value)
}

fn integer<T>(code: TypeCode, leaf: &Value) -> Result<T, FieldError>
where
    T: TryFrom<u64> + TryFrom<i64>,
{
    let converted = if let Some(value) = leaf.as_u64() {
        T::try_from(value).ok()
    } else if let Some(value) = leaf.as_i64() {
        T::try_from(value).ok()
    } else {
        return Err(FieldError::LeafMismatch {
            expected: "an integer",
            found: kind_name(leaf),
        });
    };
    converted.ok_or_else(|| FieldError::Overflow {
        code,
        value: leaf.to_string(),
    })
}

/// Widens through the shortest decimal form, so `0.1_f32` stays `0.1`.
fn widen(value: f32) -> f64 {
    value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(value))
}

/// Narrows to `f32`; a finite leaf beyond the `f32` range is an overflow.
fn narrow(leaf: &Value) -> Result<f32, FieldError> {
    let wide = float(leaf)?;
    let value = wide as f32;
    if value.is_finite() || !wide.is_finite() {
        Ok(value)
    } else {
        Err(FieldError::Overflow {
            code: TypeCode::F32,
            value: leaf.to_string(),
        })
    }
}

fn float(leaf: &Value) -> Result<f64, FieldError> {
    leaf.as_f64().ok_or_else(|| FieldError::LeafMismatch {
        expected: "a number",
        found: kind_name(leaf),
    })
}

/// Writes `leaf` into a scalar field.
///
/// The storage is only written once the leaf has been fully validated.
/// `I8` accepts both its unsigned encoding (`0..=255`) and `-128..=-1`.
pub(super) fn decode_scalar(
    code: TypeCode,
    leaf: &Value,
    storage: &mut dyn Any,
) -> Result<(), FieldError> {
    match code {
        TypeCode::I8 => {
            let target = slot::<i8>(code, storage)?;
            *target = match leaf.as_u64() {
                Some(_) => i8::from_ne_bytes([integer::<u8>(code, leaf)?]),
                None => integer::<i8>(code, leaf)?,
            };
        }
        TypeCode::I16 => *slot::<i16>(code, storage)? = integer(code, leaf)?,
        TypeCode::I32 => *slot::<i32>(code, storage)? = integer(code, leaf)?,
        TypeCode::I64 => *slot::<i64>(code, storage)? = integer(code, leaf)?,
        TypeCode::U8 => *slot::<u8>(code, storage)? = integer(code, leaf)?,
        TypeCode::U16 => *slot::<u16>(code, storage)? = integer(code, leaf)?,
        TypeCode::U32 => *slot::<u32>(code, storage)? = integer(code, leaf)?,
        TypeCode::U64 => *slot::<u64>(code, storage)? = integer(code, leaf)?,
        TypeCode::F32 => *slot::<f32>(code, storage)? = narrow(leaf)?,
        TypeCode::F64 => *slot::<f64>(code, storage)? = float(leaf)?,
        TypeCode::Bool => {
            *slot::<bool>(code, storage)? =
                leaf.as_bool().ok_or_else(|| FieldError::LeafMismatch {
                    expected: "a boolean",
                    found: kind_name(leaf),
                })?;
        }
        _ => return Err(FieldError::StorageMismatch(code)),
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{decode_scalar, encode_scalar};
    use crate::info::TypeCode;
    use crate::json::FieldError;
    use alloc::string::ToString;
    use serde_json::{Value, json};

    #[test]
    fn i8_is_emitted_unsigned() {
        assert_eq!(encode_scalar(TypeCode::I8, &-1_i8).unwrap(), json!(255));
        assert_eq!(encode_scalar(TypeCode::I8, &65_i8).unwrap(), json!(65));

        let mut value = 0_i8;
        decode_scalar(TypeCode::I8, &json!(255), &mut value).unwrap();
        assert_eq!(value, -1);
        decode_scalar(TypeCode::I8, &json!(-128), &mut value).unwrap();
        assert_eq!(value, -128);
        assert!(matches!(
            decode_scalar(TypeCode::I8, &json!(256), &mut value),
            Err(FieldError::Overflow { .. })
        ));
        assert_eq!(value, -128);
    }

    #[test]
    fn integers_must_fit() {
        let mut value = 7_u16;
        let err = decode_scalar(TypeCode::U16, &json!(70000), &mut value).unwrap_err();
        assert_eq!(err.to_string(), "70000 does not fit in `u16`");
        assert_eq!(value, 7);

        assert!(matches!(
            decode_scalar(TypeCode::U16, &json!(-1), &mut value),
            Err(FieldError::Overflow { .. })
        ));
        assert!(matches!(
            decode_scalar(TypeCode::U16, &json!(1.5), &mut value),
            Err(FieldError::LeafMismatch { .. })
        ));
        assert!(matches!(
            decode_scalar(TypeCode::U16, &json!("12"), &mut value),
            Err(FieldError::LeafMismatch { found: "a string", .. })
        ));
        assert_eq!(value, 7);

        let mut wide = 0_i64;
        decode_scalar(TypeCode::I64, &json!(i64::MIN), &mut wide).unwrap();
        assert_eq!(wide, i64::MIN);
    }

    #[test]
    fn floats_and_bools() {
        assert_eq!(encode_scalar(TypeCode::F32, &0.5_f32).unwrap(), json!(0.5));
        assert_eq!(encode_scalar(TypeCode::F64, &f64::NAN).unwrap(), Value::Null);

        let mut float = 0.0_f64;
        decode_scalar(TypeCode::F64, &json!(3), &mut float).unwrap();
        assert_eq!(float, 3.0);

        let mut flag = false;
        decode_scalar(TypeCode::Bool, &json!(true), &mut flag).unwrap();
        assert!(flag);
        assert!(decode_scalar(TypeCode::Bool, &json!(1), &mut flag).is_err());
    }

    #[test]
    fn f32_uses_shortest_form() {
        let leaf = encode_scalar(TypeCode::F32, &0.1_f32).unwrap();
        assert_eq!(leaf.to_string(), "0.1");

        let mut value = 0.0_f32;
        decode_scalar(TypeCode::F32, &leaf, &mut value).unwrap();
        assert_eq!(value, 0.1_f32);

        let max = encode_scalar(TypeCode::F32, &f32::MAX).unwrap();
        decode_scalar(TypeCode::F32, &max, &mut value).unwrap();
        assert_eq!(value, f32::MAX);
        assert_eq!(encode_scalar(TypeCode::F32, &f32::INFINITY).unwrap(), Value::Null);
    }

    #[test]
    fn f32_out_of_range_is_overflow() {
        let mut value = 1.5_f32;
        assert!(matches!(
            decode_scalar(TypeCode::F32, &json!(1e300), &mut value),
            Err(FieldError::Overflow { code: TypeCode::F32, .. })
        ));
        assert!(matches!(
            decode_scalar(TypeCode::F32, &json!(-1e300), &mut value),
            Err(FieldError::Overflow { .. })
        ));
        assert_eq!(value, 1.5);

        decode_scalar(TypeCode::F32, &json!(-2.25), &mut value).unwrap();
        assert_eq!(value, -2.25);
    }

    #[test]
    fn storage_must_match_code() {
        assert_eq!(
            encode_scalar(TypeCode::U32, &1_u16),
            Err(FieldError::StorageMismatch(TypeCode::U32))
        );
        let mut value = 1_u16;
        assert_eq!(
            decode_scalar(TypeCode::U32, &json!(1), &mut value),
            Err(FieldError::StorageMismatch(TypeCode::U32))
        );
    }
}
