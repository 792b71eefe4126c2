use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use crate::info::{FixedArray, Nullable, TextBuffer};

// -----------------------------------------------------------------------------
// Projection

trait Project: Send + Sync {
    fn record_type(&self) -> TypeId;

    fn record_type_name(&self) -> &'static str;

    fn field_type_name(&self) -> &'static str;

    fn field<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any>;

    fn field_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct Projection<R, F> {
    get: fn(&R) -> &F,
    get_mut: fn(&mut R) -> &mut F,
}

impl<R: Any, F: Any> Project for Projection<R, F> {
    #[inline]
    fn record_type(&self) -> TypeId {
        TypeId::of::<R>()
    }

    #[inline]
    fn record_type_name(&self) -> &'static str {
        type_name::<R>()
    }

    #[inline]
    fn field_type_name(&self) -> &'static str {
        type_name::<F>()
    }

    fn field<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        let record = record.downcast_ref::<R>()?;
        Some((self.get)(record) as &dyn Any)
    }

    fn field_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let record = record.downcast_mut::<R>()?;
        Some((self.get_mut)(record) as &mut dyn Any)
    }
}

// -----------------------------------------------------------------------------
// FieldAccess

/// A type-erased path from a record to one of its fields.
///
/// Built from a pair of plain projection functions, so the engine never
/// computes addresses: a projection applied to a record of another type
/// yields `None`.
///
/// # Example
///
/// ```
/// use mr_record::info::FieldAccess;
///
/// struct Point { x: i32, y: i32 }
///
/// let access = FieldAccess::new::<Point, i32>(|p| &p.y, |p| &mut p.y);
///
/// let mut point = Point { x: 1, y: 2 };
/// let y = access.get(&point).unwrap();
/// assert_eq!(y.downcast_ref::<i32>(), Some(&2));
///
/// *access.get_mut(&mut point).unwrap().downcast_mut::<i32>().unwrap() = 5;
/// assert_eq!(point.y, 5);
///
/// assert!(access.get(&"not a point").is_none());
/// ```
#[derive(Clone)]
pub struct FieldAccess(Arc<dyn Project>);

impl FieldAccess {
    /// Erases the projection pair `get` / `get_mut` of record `R`.
    pub fn new<R: Any, F: Any>(get: fn(&R) -> &F, get_mut: fn(&mut R) -> &mut F) -> Self {
        Self(Arc::new(Projection { get, get_mut }))
    }

    /// The field of `record`, or `None` if `record` is not the expected type.
    #[inline]
    pub fn get<'a>(&self, record: &'a dyn Any) -> Option<&'a dyn Any> {
        self.0.field(record)
    }

    /// Mutable counterpart of [`get`](Self::get).
    #[inline]
    pub fn get_mut<'a>(&self, record: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.0.field_mut(record)
    }

    /// The [`TypeId`] of the record this access projects from.
    #[inline]
    pub fn record_type(&self) -> TypeId {
        self.0.record_type()
    }

    #[inline]
    pub fn record_type_name(&self) -> &'static str {
        self.0.record_type_name()
    }

    #[inline]
    pub fn field_type_name(&self) -> &'static str {
        self.0.field_type_name()
    }
}

impl fmt::Debug for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FieldAccess({} -> {})",
            self.record_type_name(),
            self.field_type_name()
        )
    }
}

// -----------------------------------------------------------------------------
// FieldView

/// How the engine looks inside a field once it has been projected.
///
/// Each variant carries functions monomorphised for the field's concrete
/// type when the descriptor was built.
#[derive(Clone, Copy)]
pub(crate) enum FieldView {
    /// The field is handled as a whole, by downcasting.
    Direct,
    Bytes {
        bytes: fn(&dyn Any) -> Option<&[u8]>,
        bytes_mut: fn(&mut dyn Any) -> Option<&mut [u8]>,
    },
    Elements {
        len: usize,
        element: fn(&dyn Any, usize) -> Option<&dyn Any>,
        element_mut: fn(&mut dyn Any, usize) -> Option<&mut dyn Any>,
    },
    Nullable {
        reset: fn(&mut dyn Any) -> bool,
    },
}

impl FieldView {
    pub(crate) fn text<B: TextBuffer>() -> Self {
        Self::Bytes {
            bytes: text_bytes::<B>,
            bytes_mut: text_bytes_mut::<B>,
        }
    }

    pub(crate) fn elements<A: FixedArray>() -> Self {
        Self::Elements {
            len: A::LEN,
            element: array_element::<A>,
            element_mut: array_element_mut::<A>,
        }
    }

    pub(crate) fn nullable<P: Nullable>() -> Self {
        Self::Nullable {
            reset: reset_nullable::<P>,
        }
    }
}

impl fmt::Debug for FieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("Direct"),
            Self::Bytes { .. } => f.write_str("Bytes"),
            Self::Elements { len, .. } => f.debug_struct("Elements").field("len", len).finish(),
            Self::Nullable { .. } => f.write_str("Nullable"),
        }
    }
}

fn text_bytes<B: TextBuffer>(field: &dyn Any) -> Option<&[u8]> {
    field.downcast_ref::<B>().map(B::bytes)
}

fn text_bytes_mut<B: TextBuffer>(field: &mut dyn Any) -> Option<&mut [u8]> {
    field.downcast_mut::<B>().map(B::bytes_mut)
}

fn array_element<A: FixedArray>(field: &dyn Any, index: usize) -> Option<&dyn Any> {
    let element = field.downcast_ref::<A>()?.element(index)?;
    Some(element as &dyn Any)
}

fn array_element_mut<A: FixedArray>(field: &mut dyn Any, index: usize) -> Option<&mut dyn Any> {
    let element = field.downcast_mut::<A>()?.element_mut(index)?;
    Some(element as &mut dyn Any)
}

fn reset_nullable<P: Nullable>(field: &mut dyn Any) -> bool {
    match field.downcast_mut::<P>() {
        Some(slot) => {
            *slot = P::null();
            true
        }
        None => false,
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{FieldAccess, FieldView};
    use core::any::Any;

    struct Sample {
        name: [u8; 4],
        values: [u16; 3],
        next: *const Sample,
    }

    fn sample() -> Sample {
        Sample {
            name: *b"abc\0",
            values: [1, 2, 3],
            next: core::ptr::dangling(),
        }
    }

    #[test]
    fn projection_rejects_foreign_records() {
        let access = FieldAccess::new::<Sample, [u16; 3]>(|s| &s.values, |s| &mut s.values);
        let mut other = 7_u32;
        assert!(access.get(&other).is_none());
        assert!(access.get_mut(&mut other).is_none());
        assert_eq!(access.record_type(), core::any::TypeId::of::<Sample>());
    }

    #[test]
    fn element_view_is_bounds_checked() {
        let FieldView::Elements { len, element, element_mut } = FieldView::elements::<[u16; 3]>()
        else {
            panic!("expected an element view");
        };
        assert_eq!(len, 3);

        let mut record = sample();
        let values: &mut dyn Any = &mut record.values;
        assert_eq!(element(values, 2).and_then(|e| e.downcast_ref::<u16>()), Some(&3));
        assert!(element(values, 3).is_none());

        *element_mut(values, 0).unwrap().downcast_mut::<u16>().unwrap() = 9;
        assert_eq!(record.values, [9, 2, 3]);
    }

    #[test]
    fn byte_and_nullable_views() {
        let mut record = sample();

        let FieldView::Bytes { bytes, .. } = FieldView::text::<[u8; 4]>() else {
            panic!("expected a byte view");
        };
        assert_eq!(bytes(&record.name), Some(&b"abc\0"[..]));
        assert!(bytes(&record.values).is_none());

        let FieldView::Nullable { reset } = FieldView::nullable::<*const Sample>() else {
            panic!("expected a nullable view");
        };
        assert!(reset(&mut record.next));
        assert!(record.next.is_null());
        assert!(!reset(&mut record.values));
    }
}
