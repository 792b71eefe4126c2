use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::any::TypeId;

use mr_utils::hash::{FixedHashState, HashMap};

use crate::info::FieldDescriptor;
use crate::registry::{Record, RecordInfo};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of record metadata, keyed by record id.
///
/// The registry owns every descriptor list; the [`Encoder`] and [`Decoder`]
/// only borrow them for the duration of a call. Registering an id that is
/// already present replaces its metadata as a whole.
///
/// # Example
///
/// ```
/// use mr_record::info::FieldDescriptor;
/// use mr_record::registry::TypeRegistry;
///
/// struct Pair { a: u8, b: u8 }
///
/// let mut registry = TypeRegistry::new();
/// registry.register_fields("Pair", vec![
///     FieldDescriptor::scalar::<Pair, u8>("a", |p| &p.a, |p| &mut p.a),
/// ]);
/// registry.register_fields("Pair", vec![
///     FieldDescriptor::scalar::<Pair, u8>("a", |p| &p.a, |p| &mut p.a),
///     FieldDescriptor::scalar::<Pair, u8>("b", |p| &p.b, |p| &mut p.b),
/// ]);
///
/// // last write wins
/// assert_eq!(registry.get_fields("Pair").unwrap().len(), 2);
/// assert!(registry.lookup("Unknown").is_none());
/// ```
///
/// [`Encoder`]: crate::json::Encoder
/// [`Decoder`]: crate::json::Decoder
pub struct TypeRegistry {
    records: HashMap<Cow<'static, str>, RecordInfo>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    #[inline]
    pub fn new() -> Self {
        Self {
            records: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Stores `fields` under `id`, replacing anything registered before.
    ///
    /// No validation is performed, see [`validate`](Self::validate).
    pub fn register_fields(
        &mut self,
        id: impl Into<Cow<'static, str>>,
        fields: Vec<FieldDescriptor>,
    ) {
        let id = id.into();
        let info = RecordInfo::new(id.clone(), fields);
        self.records.insert(id, info);
    }

    /// Stores `info` under its own id, replacing anything registered before.
    pub fn register_info(&mut self, info: RecordInfo) {
        let id = Cow::Owned(info.id().into());
        self.records.insert(id, info);
    }

    /// Registers the record `T` and then, through
    /// [`Record::register_dependencies`], every record it nests.
    ///
    /// If `T` itself is already registered under its id, nothing happens,
    /// so dependency walks over shared records terminate. An entry for the
    /// same id that belongs to another Rust type (or to none) is replaced.
    ///
    /// # Example
    ///
    /// ```
    /// use mr_record::derive::Record;
    /// use mr_record::registry::TypeRegistry;
    ///
    /// #[derive(Record)]
    /// #[record(id = "Wheel")]
    /// struct Wheel {
    ///     radius: f32,
    /// }
    ///
    /// #[derive(Record)]
    /// #[record(id = "Bike")]
    /// struct Bike {
    ///     #[record(nested)]
    ///     wheels: [Wheel; 2],
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// registry.register::<Bike>();
    ///
    /// // The main record and its dependency.
    /// assert!(registry.contains("Bike"));
    /// assert!(registry.contains("Wheel"));
    /// ```
    pub fn register<T: Record>(&mut self) {
        let id = T::record_id();
        if let Some(info) = self.records.get(id)
            && info.type_id() == Some(TypeId::of::<T>())
        {
            return;
        }
        self.records.insert(Cow::Borrowed(id), RecordInfo::of::<T>());
        T::register_dependencies(self);
    }

    /// Registers every record annotated with `#[record(auto_register)]`.
    ///
    /// This is equivalent to calling [`register`](Self::register) for each of
    /// them, so repeated calls do not duplicate anything.
    ///
    /// ## Return Value
    ///
    /// The number of registration hooks that ran. Zero when the
    /// `auto_register` feature is disabled or the platform is not supported
    /// by `inventory`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mr_record::derive::Record;
    /// use mr_record::registry::TypeRegistry;
    ///
    /// #[derive(Record)]
    /// #[record(id = "Config", auto_register)]
    /// struct Config {
    ///     retries: u8,
    /// }
    ///
    /// let mut registry = TypeRegistry::new();
    /// assert!(registry.auto_register() >= 1);
    /// assert!(registry.contains("Config"));
    /// ```
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> usize {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_records(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            0
        }
    }

    /// Returns the metadata registered under `id`.
    #[inline]
    pub fn lookup(&self, id: &str) -> Option<&RecordInfo> {
        self.records.get(id)
    }

    /// Returns the ordered field descriptors registered under `id`.
    #[inline]
    pub fn get_fields(&self, id: &str) -> Option<&[FieldDescriptor]> {
        self.records.get(id).map(RecordInfo::fields)
    }

    /// Whether `id` has been registered.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over registered metadata in unspecified order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &RecordInfo> {
        self.records.values()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

#[cfg(feature = "std")]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared [`TypeRegistry`] for programs that register records while other
/// threads are encoding or decoding.
///
/// A poisoned lock is recovered, the registry has no invariants a panicking
/// writer could break half-way.
#[cfg(feature = "std")]
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

#[cfg(feature = "std")]
impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::info::{FieldDescriptor, TypeCode};
    use crate::registry::Record;
    use alloc::vec;
    use alloc::vec::Vec;

    struct Inner {
        value: u32,
    }

    impl Record for Inner {
        fn record_id() -> &'static str {
            "Inner"
        }

        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::scalar::<Self, u32>("value", |r| &r.value, |r| &mut r.value)]
        }
    }

    struct Outer {
        inner: Inner,
        list: [Inner; 2],
    }

    impl Record for Outer {
        fn record_id() -> &'static str {
            "Outer"
        }

        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::record::<Self, Inner>("inner", |r| &r.inner, |r| &mut r.inner),
                FieldDescriptor::record_array::<Self, [Inner; 2]>(
                    "list",
                    |r| &r.list,
                    |r| &mut r.list,
                ),
            ]
        }

        fn register_dependencies(registry: &mut TypeRegistry) {
            registry.register::<Inner>();
        }
    }

    #[test]
    fn register_walks_dependencies() {
        let mut registry = TypeRegistry::new();
        assert!(registry.is_empty());

        registry.register::<Outer>();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("Inner"));

        let list = &registry.get_fields("Outer").unwrap()[1];
        assert_eq!(list.element_type_code(), TypeCode::Record);
        assert_eq!(list.nested_type_id(), Some("Inner"));
        assert_eq!(list.capacity(), 2);
    }

    #[test]
    fn register_replaces_foreign_entries() {
        let mut registry = TypeRegistry::new();
        registry.register_fields("Inner", Vec::new());
        assert_eq!(registry.get_fields("Inner").map(<[_]>::len), Some(0));

        registry.register::<Inner>();
        let info = registry.lookup("Inner").unwrap();
        assert_eq!(info.fields().len(), 1);
        assert_eq!(info.type_id(), Some(core::any::TypeId::of::<Inner>()));

        // Same Rust type again: kept as is.
        registry.register::<Inner>();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_fields_overwrites() {
        let mut registry = TypeRegistry::new();
        registry.register::<Inner>();
        registry.register_fields("Inner", vec![FieldDescriptor::opaque("raw")]);

        let info = registry.lookup("Inner").unwrap();
        assert_eq!(info.type_id(), None);
        assert_eq!(info.fields()[0].name(), "raw");
        assert!(info.field("value").is_none());
    }

    #[cfg(feature = "std")]
    #[test]
    fn shared_registry() {
        use super::TypeRegistryArc;

        let shared = TypeRegistryArc::default();
        let writer = shared.clone();
        std::thread::spawn(move || writer.write().register::<Outer>())
            .join()
            .unwrap();
        assert!(shared.read().contains("Outer"));
    }
}
