use core::any::Any;

use crate::info::TypeCode;

// -----------------------------------------------------------------------------
// Scalar

/// A primitive that is stored as a single JSON number or boolean.
///
/// Implemented for the eight fixed-width integers, `f32`, `f64` and `bool`.
pub trait Scalar: Any + Copy {
    /// The [`TypeCode`] the engine dispatches on for this primitive.
    const TYPE_CODE: TypeCode;
}

macro_rules! impl_scalar {
    ($($ty:ty => $code:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const TYPE_CODE: TypeCode = TypeCode::$code;
            }
        )*
    };
}

impl_scalar! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
}

// -----------------------------------------------------------------------------
// TextBuffer

/// Fixed-size storage holding zero-terminated text.
pub trait TextBuffer: Any {
    /// Total number of bytes, terminator included.
    const CAPACITY: usize;

    fn bytes(&self) -> &[u8];

    fn bytes_mut(&mut self) -> &mut [u8];
}

impl<const N: usize> TextBuffer for [u8; N] {
    const CAPACITY: usize = N;

    #[inline]
    fn bytes(&self) -> &[u8] {
        self
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

// -----------------------------------------------------------------------------
// FixedArray

/// A fixed-length sequence of homogeneous elements.
///
/// Element access is bounds-checked and returns `None` past the end.
pub trait FixedArray: Any {
    type Element: Any;

    const LEN: usize;

    fn element(&self, index: usize) -> Option<&Self::Element>;

    fn element_mut(&mut self, index: usize) -> Option<&mut Self::Element>;
}

impl<T: Any, const N: usize> FixedArray for [T; N] {
    type Element = T;

    const LEN: usize = N;

    #[inline]
    fn element(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn element_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

// -----------------------------------------------------------------------------
// Nullable

/// A reference-like value with a null state.
///
/// Decoding resets pointer fields to [`Nullable::null`]; addresses are never
/// read from or written to JSON.
pub trait Nullable: Any {
    fn null() -> Self;
}

impl<T: 'static> Nullable for *const T {
    #[inline]
    fn null() -> Self {
        core::ptr::null()
    }
}

impl<T: 'static> Nullable for *mut T {
    #[inline]
    fn null() -> Self {
        core::ptr::null_mut()
    }
}

impl<T: 'static> Nullable for Option<T> {
    #[inline]
    fn null() -> Self {
        None
    }
}
