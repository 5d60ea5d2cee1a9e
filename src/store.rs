use crate::access::MetadataAccess;
use crate::binding::{AccessorBinding, TypedBinding};
use crate::error::MetadataError;
use crate::kind::{Kind, Storable, Value};
use crate::nullable::NullableMetadataStore;
use crate::options::StoreOptions;
use crate::storage::{Placement, Storage};
use crate::typed::TypedSubmap;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// A heterogeneous, string-keyed metadata store
///
/// Each identifier is owned by exactly one submap at a time, chosen by the
/// kind of the value last written to it. Typed views such as
/// [`ints`](MetadataStore::ints) read a single submap without any casting;
/// the whole-store view reads whichever submap currently owns the
/// identifier.
///
/// Cloning a `MetadataStore` yields another handle to the same storage.
///
/// # Examples
///
/// ```
/// use sovran_metadata::{MetadataAccess, MetadataStore, Value};
///
/// let store = MetadataStore::new("example");
/// store.set("a", 42i32);
/// store.set("b", 8i32);
/// assert_eq!(store.ints().get("a")? + store.ints().get("b")?, 50);
///
/// store.set("s", "hi");
/// assert_eq!(store.strings().get("s")?.to_uppercase(), "HI");
///
/// store.set("s", 3.14f64);
/// assert_eq!(store.doubles().get("s")? * 2.0, 6.28);
/// assert_eq!(store.get("s")?, Value::Double(3.14));
/// # Ok::<(), sovran_metadata::MetadataError>(())
/// ```
#[derive(Clone)]
pub struct MetadataStore {
    name: String,
    options: StoreOptions,
    inner: Arc<Mutex<Storage>>,
}

impl MetadataStore {
    /// Creates a new, empty store with default options
    ///
    /// The name is a label for diagnostics and has no other effect.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, StoreOptions::default())
    }

    /// Creates a new, empty store sized and configured by `options`
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_metadata::{MetadataAccess, MetadataStore, StoreOptions};
    ///
    /// let store = MetadataStore::with_options(
    ///     "session",
    ///     StoreOptions::default().with_initial_capacity(32),
    /// );
    /// assert_eq!(store.options().initial_capacity, 32);
    /// assert!(store.is_empty());
    /// ```
    pub fn with_options(name: impl Into<String>, options: StoreOptions) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(Mutex::new(Storage::with_capacity(options.initial_capacity))),
            options,
        }
    }

    /// The options this store was created with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Shorthand for `options().reserved_prefixes`
    pub fn reserved_prefixes(&self) -> &[String] {
        &self.options.reserved_prefixes
    }

    /// Returns true if `identifier` starts with a reserved prefix
    ///
    /// Reserved identifiers are still accepted by every write.
    pub fn is_reserved(&self, identifier: &str) -> bool {
        self.options.is_reserved(identifier)
    }

    /// The strict view of the `i8` submap
    pub fn bytes(&self) -> TypedSubmap<'_, i8> {
        self.typed()
    }

    /// The strict view of the `i16` submap
    pub fn shorts(&self) -> TypedSubmap<'_, i16> {
        self.typed()
    }

    /// The strict view of the `i32` submap
    pub fn ints(&self) -> TypedSubmap<'_, i32> {
        self.typed()
    }

    /// The strict view of the `i64` submap
    pub fn longs(&self) -> TypedSubmap<'_, i64> {
        self.typed()
    }

    /// The strict view of the `f32` submap
    pub fn floats(&self) -> TypedSubmap<'_, f32> {
        self.typed()
    }

    /// The strict view of the `f64` submap
    pub fn doubles(&self) -> TypedSubmap<'_, f64> {
        self.typed()
    }

    /// The strict view of the `bool` submap
    pub fn booleans(&self) -> TypedSubmap<'_, bool> {
        self.typed()
    }

    /// The strict view of the `char` submap
    pub fn chars(&self) -> TypedSubmap<'_, char> {
        self.typed()
    }

    /// The strict view of the `String` submap
    pub fn strings(&self) -> TypedSubmap<'_, String> {
        self.typed()
    }

    /// The typed view for any storable type
    ///
    /// `typed::<AnyValue>()` is the view of the fallback submap.
    pub fn typed<T: Storable>(&self) -> TypedSubmap<'_, T> {
        TypedSubmap::new(self)
    }

    /// The nullable façade over this store's storage
    pub fn nullable(&self) -> NullableMetadataStore<'_> {
        NullableMetadataStore::new(self)
    }

    /// The kind currently owning `identifier`, if it holds a non-null value
    pub fn locate(&self, identifier: &str) -> Option<Kind> {
        self.storage().value_owner(identifier)
    }

    /// Binds `identifier` to a self-healing accessor
    pub fn bind(&self, identifier: impl Into<String>) -> AccessorBinding<'_> {
        AccessorBinding::new(self, identifier.into())
    }

    /// Binds `identifier` through the typed view of `T`
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::UnknownTypedIdentifier` unless `identifier`
    /// currently holds a non-null value of type `T`.
    pub fn bind_static<T: Storable>(
        &self,
        identifier: &str,
    ) -> Result<TypedBinding<TypedSubmap<'_, T>>, MetadataError> {
        match self.locate(identifier) {
            Some(kind) if kind == T::KIND => Ok(self.typed::<T>().bind(identifier)),
            _ => Err(MetadataError::typed(identifier, T::KIND, false)),
        }
    }

    /// Returns the number of non-null entries
    pub fn len(&self) -> usize {
        self.storage().value_count()
    }

    /// Returns true if no identifier holds a non-null value
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every critical section leaves the index consistent with the submaps,
    // so a poisoned lock still guards valid state.
    pub(crate) fn storage(&self) -> MutexGuard<'_, Storage> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn install<T: Storable>(&self, identifier: &str, value: Option<T>) {
        let placement = self.storage().install(identifier, value);
        self.trace_placement(identifier, placement);
    }

    pub(crate) fn assign(&self, identifier: &str, value: Option<Value>) {
        let placement = self.storage().assign(identifier, value);
        self.trace_placement(identifier, placement);
    }

    pub(crate) fn take_value(&self, kind: Kind, identifier: &str) -> Option<Value> {
        let removed = self.storage().take_value(kind, identifier);
        if removed.is_some() {
            trace!(store = %self.name, identifier, %kind, "removed entry");
        }
        removed
    }

    pub(crate) fn remove_slot(&self, identifier: &str) -> Option<Option<Value>> {
        let (kind, slot) = self.storage().remove_slot(identifier)?;
        trace!(store = %self.name, identifier, %kind, "removed slot");
        Some(slot)
    }

    pub(crate) fn take_slot(&self, kind: Kind, identifier: &str) -> Option<Option<Value>> {
        let removed = self.storage().take_slot(kind, identifier);
        if removed.is_some() {
            trace!(store = %self.name, identifier, %kind, "removed slot");
        }
        removed
    }

    fn trace_placement(&self, identifier: &str, placement: Placement) {
        match placement.evicted {
            Some(from) => debug!(
                store = %self.name,
                identifier,
                %from,
                to = %placement.kind,
                "ownership transferred"
            ),
            None => trace!(store = %self.name, identifier, kind = %placement.kind, "stored entry"),
        }
    }
}

impl MetadataAccess for MetadataStore {
    type Value = Value;

    fn name(&self) -> String {
        self.name.clone()
    }

    fn get(&self, identifier: &str) -> Result<Value, MetadataError> {
        self.get_or_null(identifier)
            .ok_or_else(|| MetadataError::untyped(identifier))
    }

    fn get_or_null(&self, identifier: &str) -> Option<Value> {
        self.storage().value(identifier)
    }

    fn set(&self, identifier: &str, value: impl Into<Self::Value>) {
        self.assign(identifier, Some(value.into()));
    }

    fn remove(&self, identifier: &str) -> Option<Value> {
        let (kind, value) = self.storage().remove_value(identifier)?;
        trace!(store = %self.name, identifier, %kind, "removed entry");
        Some(value)
    }

    fn exists(&self, identifier: &str) -> bool {
        self.get_or_null(identifier).is_some()
    }

    fn all_entries(&self) -> HashMap<String, Value> {
        self.storage().values()
    }
}

impl Default for MetadataStore {
    fn default() -> Self {
        Self::new("metadata")
    }
}

pub(crate) fn write_entries<V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    entries: HashMap<String, Option<V>>,
) -> fmt::Result {
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    write!(f, "{}: {{", name)?;
    for (i, (identifier, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match value {
            Some(value) => write!(f, "{}={}", identifier, value)?,
            None => write!(f, "{}=null", identifier)?,
        }
    }
    f.write_str("}")
}

impl fmt::Display for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .all_entries()
            .into_iter()
            .map(|(id, value)| (id, Some(value)))
            .collect();
        write_entries(f, &self.name, entries)
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("name", &self.name)
            .field("entries", &self.storage().value_count())
            .finish()
    }
}
