use alloc::borrow::Cow;
use core::any::Any;

use crate::info::{FieldAccess, FieldView, FixedArray, Nullable, Scalar, TextBuffer, TypeCode};
use crate::registry::Record;

// -----------------------------------------------------------------------------
// FieldDescriptor

/// Static metadata for one field of a record.
///
/// A descriptor names the field, classifies it with a [`TypeCode`] and carries
/// the typed accessors the engine uses to reach it. Layout numbers (`size`,
/// `element_size`, `element_count`) are filled in by the typed constructors
/// and may be overridden with the `with_*` builders.
///
/// Descriptors are usually produced by `#[derive(Record)]`, but can be
/// written by hand:
///
/// ```
/// use mr_record::info::{FieldDescriptor, TypeCode};
///
/// struct Sensor {
///     id: u16,
///     label: [u8; 16],
///     samples: [f32; 4],
/// }
///
/// let fields = [
///     FieldDescriptor::scalar::<Sensor, u16>("id", |s| &s.id, |s| &mut s.id),
///     FieldDescriptor::text::<Sensor, [u8; 16]>("label", |s| &s.label, |s| &mut s.label),
///     FieldDescriptor::array::<Sensor, [f32; 4]>("samples", |s| &s.samples, |s| &mut s.samples),
/// ];
///
/// assert_eq!(fields[0].type_code(), TypeCode::U16);
/// assert_eq!(fields[1].size(), 16);
/// assert_eq!(fields[2].element_type_code(), TypeCode::F32);
/// assert_eq!(fields[2].capacity(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    type_code: TypeCode,
    access: Option<FieldAccess>,
    view: FieldView,
    size: usize,
    element_type_code: TypeCode,
    element_size: usize,
    element_count: usize,
    nested_type_id: Option<Cow<'static, str>>,
}

impl FieldDescriptor {
    /// A descriptor without accessors.
    ///
    /// Fields built this way can only be encoded as placeholders; any kind that
    /// needs to read or write storage fails for this field alone.
    pub const fn new(name: &'static str, type_code: TypeCode) -> Self {
        Self {
            name,
            type_code,
            access: None,
            view: FieldView::Direct,
            size: 0,
            element_type_code: TypeCode::Unknown,
            element_size: 0,
            element_count: 0,
            nested_type_id: None,
        }
    }

    fn with_access<R: Any, F: Any>(
        name: &'static str,
        type_code: TypeCode,
        view: FieldView,
        get: fn(&R) -> &F,
        get_mut: fn(&mut R) -> &mut F,
    ) -> Self {
        Self {
            access: Some(FieldAccess::new(get, get_mut)),
            view,
            size: size_of::<F>(),
            ..Self::new(name, type_code)
        }
    }

    /// An integer, float or `bool` field.
    pub fn scalar<R: Any, F: Scalar>(
        name: &'static str,
        get: fn(&R) -> &F,
        get_mut: fn(&mut R) -> &mut F,
    ) -> Self {
        Self::with_access(name, F::TYPE_CODE, FieldView::Direct, get, get_mut)
    }

    /// A zero-terminated text buffer.
    pub fn text<R: Any, B: TextBuffer>(
        name: &'static str,
        get: fn(&R) -> &B,
        get_mut: fn(&mut R) -> &mut B,
    ) -> Self {
        Self::with_access(name, TypeCode::Text, FieldView::text::<B>(), get, get_mut)
            .with_size(B::CAPACITY)
    }

    /// A fixed-size array of scalars.
    pub fn array<R: Any, A>(
        name: &'static str,
        get: fn(&R) -> &A,
        get_mut: fn(&mut R) -> &mut A,
    ) -> Self
    where
        A: FixedArray,
        A::Element: Scalar,
    {
        Self::with_access(name, TypeCode::Array, FieldView::elements::<A>(), get, get_mut)
            .with_element_type(<A::Element as Scalar>::TYPE_CODE)
            .with_element_layout::<A>()
    }

    /// A nested record, resolved through the registry by [`Record::record_id`].
    pub fn record<R: Any, T: Record>(
        name: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        Self::with_access(name, TypeCode::Record, FieldView::Direct, get, get_mut)
            .with_nested(T::record_id())
    }

    /// A fixed-size array of nested records.
    pub fn record_array<R: Any, A>(
        name: &'static str,
        get: fn(&R) -> &A,
        get_mut: fn(&mut R) -> &mut A,
    ) -> Self
    where
        A: FixedArray,
        A::Element: Record,
    {
        Self::with_access(name, TypeCode::Array, FieldView::elements::<A>(), get, get_mut)
            .with_element_type(TypeCode::Record)
            .with_element_layout::<A>()
            .with_nested(<A::Element as Record>::record_id())
    }

    /// A raw address, encoded as a placeholder and reset to null on decode.
    pub fn pointer<R: Any, P: Nullable>(
        name: &'static str,
        get: fn(&R) -> &P,
        get_mut: fn(&mut R) -> &mut P,
    ) -> Self {
        Self::with_access(name, TypeCode::Pointer, FieldView::nullable::<P>(), get, get_mut)
    }

    /// A callable reference. Encoded as a placeholder and never decoded.
    pub const fn function(name: &'static str) -> Self {
        Self::new(name, TypeCode::Function)
    }

    /// A field of unknown kind. Encoded as a placeholder and never decoded.
    pub const fn opaque(name: &'static str) -> Self {
        Self::new(name, TypeCode::Unknown)
    }

    fn with_element_layout<A: FixedArray>(mut self) -> Self {
        self.element_size = size_of::<A::Element>();
        self.element_count = A::LEN;
        self
    }

    /// Overrides the byte size of the field.
    ///
    /// For text this bounds how many bytes are scanned and written; zero
    /// means "the whole buffer" (at most 256 bytes when encoding).
    #[inline]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Overrides the number of array elements processed.
    ///
    /// Zero falls back to `size / element_size`.
    #[inline]
    pub fn with_element_count(mut self, count: usize) -> Self {
        self.element_count = count;
        self
    }

    /// Overrides the element kind of an array.
    #[inline]
    pub fn with_element_type(mut self, code: TypeCode) -> Self {
        self.element_type_code = code;
        self
    }

    /// Overrides the id of the nested record (or record element) type.
    #[inline]
    pub fn with_nested(mut self, id: impl Into<Cow<'static, str>>) -> Self {
        self.nested_type_id = Some(id.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    #[inline]
    pub fn access(&self) -> Option<&FieldAccess> {
        self.access.as_ref()
    }

    #[inline]
    pub(crate) fn view(&self) -> FieldView {
        self.view
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn element_type_code(&self) -> TypeCode {
        self.element_type_code
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    #[inline]
    pub fn nested_type_id(&self) -> Option<&str> {
        self.nested_type_id.as_deref()
    }

    /// Number of array elements the engine processes.
    ///
    /// `element_count` when positive, otherwise `size / element_size`,
    /// otherwise zero.
    pub fn capacity(&self) -> usize {
        if self.element_count > 0 {
            self.element_count
        } else if self.element_size > 0 {
            self.size / self.element_size
        } else {
            0
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::FieldDescriptor;
    use crate::info::TypeCode;

    struct Frame {
        seq: u32,
        tag: [u8; 8],
        data: [i16; 6],
        parent: Option<u8>,
    }

    #[test]
    fn typed_constructors_fill_layout() {
        let seq = FieldDescriptor::scalar::<Frame, u32>("seq", |f| &f.seq, |f| &mut f.seq);
        assert_eq!(seq.type_code(), TypeCode::U32);
        assert_eq!(seq.size(), 4);
        assert!(seq.access().is_some());

        let tag = FieldDescriptor::text::<Frame, [u8; 8]>("tag", |f| &f.tag, |f| &mut f.tag);
        assert_eq!(tag.type_code(), TypeCode::Text);
        assert_eq!(tag.size(), 8);

        let data = FieldDescriptor::array::<Frame, [i16; 6]>("data", |f| &f.data, |f| &mut f.data);
        assert_eq!(data.type_code(), TypeCode::Array);
        assert_eq!(data.element_type_code(), TypeCode::I16);
        assert_eq!(data.element_size(), 2);
        assert_eq!(data.element_count(), 6);
        assert_eq!(data.size(), 12);
        assert_eq!(data.nested_type_id(), None);

        let parent =
            FieldDescriptor::pointer::<Frame, Option<u8>>("parent", |f| &f.parent, |f| &mut f.parent);
        assert_eq!(parent.type_code(), TypeCode::Pointer);
    }

    #[test]
    fn capacity_falls_back_to_size() {
        let data = FieldDescriptor::array::<Frame, [i16; 6]>("data", |f| &f.data, |f| &mut f.data);
        assert_eq!(data.capacity(), 6);
        assert_eq!(data.clone().with_element_count(0).capacity(), 6);
        assert_eq!(data.clone().with_element_count(0).with_size(8).capacity(), 4);
        assert_eq!(data.with_element_count(2).capacity(), 2);

        assert_eq!(FieldDescriptor::new("raw", TypeCode::Array).capacity(), 0);
    }

    #[test]
    fn detached_descriptors() {
        let callback = FieldDescriptor::function("callback");
        assert_eq!(callback.type_code(), TypeCode::Function);
        assert!(callback.access().is_none());

        let blob = FieldDescriptor::opaque("blob").with_nested("Blob");
        assert_eq!(blob.type_code(), TypeCode::Unknown);
        assert_eq!(blob.nested_type_id(), Some("Blob"));
    }
}
