use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};

use crate::info::FieldDescriptor;
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// Record

/// A type with a fixed set of described fields.
///
/// Usually implemented with `#[derive(Record)]`.
///
/// # Example
///
/// ```
/// use mr_record::info::FieldDescriptor;
/// use mr_record::registry::{Record, TypeRegistry};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Record for Point {
///     fn record_id() -> &'static str {
///         "Point"
///     }
///
///     fn fields() -> Vec<FieldDescriptor> {
///         vec![
///             FieldDescriptor::scalar::<Self, i32>("x", |p| &p.x, |p| &mut p.x),
///             FieldDescriptor::scalar::<Self, i32>("y", |p| &p.y, |p| &mut p.y),
///         ]
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Point>();
/// assert_eq!(registry.get_fields("Point").map(<[_]>::len), Some(2));
/// ```
pub trait Record: Any {
    /// The id this record is registered under.
    fn record_id() -> &'static str;

    /// Field descriptors, in output order.
    fn fields() -> Vec<FieldDescriptor>;

    /// Registers the records this one nests.
    ///
    /// Called by [`TypeRegistry::register`] after `Self` was inserted.
    #[inline]
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}

// -----------------------------------------------------------------------------
// RecordInfo

/// The metadata registered under one record id.
#[derive(Debug, Clone)]
pub struct RecordInfo {
    id: Cow<'static, str>,
    fields: Box<[FieldDescriptor]>,
    type_id: Option<TypeId>,
    type_name: Option<&'static str>,
}

impl RecordInfo {
    /// Metadata without an associated Rust type.
    ///
    /// Instances are not type-checked at the top level; each field accessor
    /// still checks the record it projects from.
    pub fn new(id: impl Into<Cow<'static, str>>, fields: impl Into<Box<[FieldDescriptor]>>) -> Self {
        Self {
            id: id.into(),
            fields: fields.into(),
            type_id: None,
            type_name: None,
        }
    }

    /// Metadata of the Rust record `T`.
    pub fn of<T: Record>() -> Self {
        Self {
            id: Cow::Borrowed(T::record_id()),
            fields: T::fields().into_boxed_slice(),
            type_id: Some(TypeId::of::<T>()),
            type_name: Some(type_name::<T>()),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// The Rust type registered for this id, if known.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }

    /// Whether `instance` may be processed with this metadata.
    ///
    /// Always `true` when no Rust type is known.
    #[inline]
    pub fn accepts(&self, instance: &dyn Any) -> bool {
        match self.type_id {
            Some(type_id) => instance.type_id() == type_id,
            None => true,
        }
    }
}
