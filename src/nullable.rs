use crate::access::MetadataAccess;
use crate::binding::{NullableAccessorBinding, TypedBinding};
use crate::error::MetadataError;
use crate::kind::{Kind, Storable, Value};
use crate::store::{write_entries, MetadataStore};
use crate::typed::NullableTypedSubmap;
use std::collections::HashMap;
use std::fmt;

/// The nullable façade of a [`MetadataStore`]
///
/// It reads and writes the very same storage as the store it came from, but
/// an identifier whose slot holds null still exists here. Writing null to an
/// identifier keeps its current owner; only a null for an identifier nobody
/// owns yet is parked in the fallback submap.
///
/// # Examples
///
/// ```
/// use sovran_metadata::{MetadataAccess, MetadataStore};
///
/// let store = MetadataStore::new("example");
/// store.set("x", "v");
/// store.nullable().set_null("x");
///
/// assert!(!store.exists("x"));
/// assert!(store.nullable().exists("x"));
/// assert_eq!(store.nullable().get("x")?, None);
/// assert!(store.get("x").is_err());
/// # Ok::<(), sovran_metadata::MetadataError>(())
/// ```
#[derive(Clone, Copy)]
pub struct NullableMetadataStore<'a> {
    store: &'a MetadataStore,
}

impl<'a> NullableMetadataStore<'a> {
    pub(crate) fn new(store: &'a MetadataStore) -> Self {
        Self { store }
    }

    /// The strict store this façade belongs to
    pub fn strict(&self) -> &'a MetadataStore {
        self.store
    }

    pub fn bytes(&self) -> NullableTypedSubmap<'a, i8> {
        self.typed()
    }

    pub fn shorts(&self) -> NullableTypedSubmap<'a, i16> {
        self.typed()
    }

    pub fn ints(&self) -> NullableTypedSubmap<'a, i32> {
        self.typed()
    }

    pub fn longs(&self) -> NullableTypedSubmap<'a, i64> {
        self.typed()
    }

    pub fn floats(&self) -> NullableTypedSubmap<'a, f32> {
        self.typed()
    }

    pub fn doubles(&self) -> NullableTypedSubmap<'a, f64> {
        self.typed()
    }

    pub fn booleans(&self) -> NullableTypedSubmap<'a, bool> {
        self.typed()
    }

    pub fn chars(&self) -> NullableTypedSubmap<'a, char> {
        self.typed()
    }

    pub fn strings(&self) -> NullableTypedSubmap<'a, String> {
        self.typed()
    }

    pub fn typed<T: Storable>(&self) -> NullableTypedSubmap<'a, T> {
        NullableTypedSubmap::new(self.store)
    }

    /// The kind currently owning `identifier`, even if its slot holds null
    pub fn locate(&self, identifier: &str) -> Option<Kind> {
        self.store.storage().owner(identifier)
    }

    /// Stores a null without changing which submap owns `identifier`
    pub fn set_null(&self, identifier: &str) {
        self.store.assign(identifier, None);
    }

    /// Stores a non-null value of any storable type
    ///
    /// `set` takes an `Option<Value>`; this accepts anything convertible into
    /// a `Value`, such as `5i32` or `"text"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_metadata::{MetadataAccess, MetadataStore};
    ///
    /// let store = MetadataStore::new("example");
    /// store.nullable().set_value("retries", 5i32);
    /// assert_eq!(store.ints().get("retries")?, 5);
    /// # Ok::<(), sovran_metadata::MetadataError>(())
    /// ```
    pub fn set_value(&self, identifier: &str, value: impl Into<Value>) {
        self.store.assign(identifier, Some(value.into()));
    }

    pub fn bind(&self, identifier: impl Into<String>) -> NullableAccessorBinding<'a> {
        NullableAccessorBinding::new(*self, identifier.into())
    }

    /// Binds `identifier` through the nullable typed view of `T`
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::UnknownTypedIdentifier` (nullable flavor)
    /// unless `identifier` is currently owned by the submap of `T`.
    pub fn bind_static<T: Storable>(
        &self,
        identifier: &str,
    ) -> Result<TypedBinding<NullableTypedSubmap<'a, T>>, MetadataError> {
        match self.locate(identifier) {
            Some(kind) if kind == T::KIND => Ok(self.typed::<T>().bind(identifier)),
            _ => Err(MetadataError::typed(identifier, T::KIND, true)),
        }
    }

    /// Returns the number of slots, nulls included
    pub fn len(&self) -> usize {
        self.store.storage().slot_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataAccess for NullableMetadataStore<'_> {
    type Value = Option<Value>;

    fn name(&self) -> String {
        format!("{} nullable", self.store.name())
    }

    fn get(&self, identifier: &str) -> Result<Option<Value>, MetadataError> {
        self.get_or_null(identifier)
            .ok_or_else(|| MetadataError::typed(identifier, Kind::Other, true))
    }

    fn get_or_null(&self, identifier: &str) -> Option<Option<Value>> {
        self.store.storage().slot(identifier)
    }

    fn set(&self, identifier: &str, value: impl Into<Self::Value>) {
        self.store.assign(identifier, value.into());
    }

    fn remove(&self, identifier: &str) -> Option<Option<Value>> {
        self.store.remove_slot(identifier)
    }

    fn exists(&self, identifier: &str) -> bool {
        self.locate(identifier).is_some()
    }

    fn all_entries(&self) -> HashMap<String, Option<Value>> {
        self.store.storage().slots()
    }
}

impl fmt::Display for NullableMetadataStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entries(f, &self.name(), self.all_entries())
    }
}

impl fmt::Debug for NullableMetadataStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableMetadataStore")
            .field("name", &self.name())
            .field("slots", &self.len())
            .finish()
    }
}
