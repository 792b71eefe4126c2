use core::fmt;

// -----------------------------------------------------------------------------
// TypeCode

/// The kind of a record field.
///
/// The set is closed: the encoder and decoder dispatch on it exhaustively and
/// degrade to placeholders for [`Unknown`](TypeCode::Unknown).
///
/// `I8` is the byte-oriented character type; it is encoded as its unsigned
/// value, so `-1_i8` becomes `255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TypeCode {
    /// No recognised kind.
    Unknown = 0x00,
    I8 = 0x01,
    I16 = 0x02,
    I32 = 0x03,
    I64 = 0x04,
    U8 = 0x05,
    U16 = 0x06,
    U32 = 0x07,
    U64 = 0x08,
    F32 = 0x10,
    F64 = 0x11,
    Bool = 0x12,
    /// Fixed-size, zero-terminated byte buffer.
    Text = 0x13,
    /// Callable reference, never serialized.
    Function = 0x14,
    /// Nested record, resolved through the registry.
    Record = 0x15,
    /// Fixed-size array.
    Array = 0x16,
    /// Raw address, never serialized.
    Pointer = 0x17,
}

impl TypeCode {
    /// Returns `true` for the integer, float and `bool` codes.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        self.is_integer() || self.is_float() || matches!(self, Self::Bool)
    }

    /// Returns `true` for signed and unsigned integer codes.
    #[inline]
    pub const fn is_integer(self) -> bool {
        self.is_signed() || matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    /// Returns `true` for signed integer codes.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns `true` for `F32` and `F64`.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Returns `true` for kinds whose content is replaced by a placeholder.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Function | Self::Pointer)
    }

    /// A short, lowercase name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Text => "text",
            Self::Function => "function",
            Self::Record => "record",
            Self::Array => "array",
            Self::Pointer => "pointer",
        }
    }
}

impl fmt::Display for TypeCode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeCode;

    #[test]
    fn classification() {
        assert!(TypeCode::I8.is_scalar());
        assert!(TypeCode::I8.is_signed());
        assert!(TypeCode::U64.is_integer());
        assert!(!TypeCode::U64.is_signed());
        assert!(TypeCode::F32.is_float());
        assert!(TypeCode::Bool.is_scalar());
        assert!(!TypeCode::Bool.is_integer());

        for code in [
            TypeCode::Unknown,
            TypeCode::Text,
            TypeCode::Function,
            TypeCode::Record,
            TypeCode::Array,
            TypeCode::Pointer,
        ] {
            assert!(!code.is_scalar(), "{code} is not a scalar");
        }

        assert!(TypeCode::Function.is_opaque());
        assert!(TypeCode::Pointer.is_opaque());
        assert!(!TypeCode::Text.is_opaque());
    }

    #[test]
    fn display() {
        assert_eq!(alloc::format!("{}", TypeCode::U16), "u16");
        assert_eq!(alloc::format!("{}", TypeCode::Text), "text");
    }
}
