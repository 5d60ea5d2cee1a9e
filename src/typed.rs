use crate::access::MetadataAccess;
use crate::binding::TypedBinding;
use crate::error::MetadataError;
use crate::kind::Storable;
use crate::store::MetadataStore;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// A strict view of the submap that stores values of type `T`
///
/// The view reads its own storage directly, so an identifier owned by another
/// kind simply is not there: `get` fails with a typed
/// `MetadataError::UnknownTypedIdentifier`. Writes go through the store's
/// dispatch, so setting a value here takes ownership of the identifier away
/// from whichever submap held it before.
///
/// A stored null is treated as absent by this view. Use
/// [`nullable`](TypedSubmap::nullable) to see it.
///
/// # Examples
///
/// ```
/// use sovran_metadata::{MetadataAccess, MetadataError, MetadataStore};
///
/// let store = MetadataStore::new("example");
/// store.set("count", 42i32);
///
/// assert_eq!(store.ints().get("count")?, 42);
///
/// // The key now moves to the strings submap
/// store.strings().set("count", "forty-two");
/// assert!(store.ints().exists_not("count"));
/// assert!(matches!(
///     store.ints().get("count"),
///     Err(MetadataError::UnknownTypedIdentifier { nullable: false, .. })
/// ));
/// # Ok::<(), MetadataError>(())
/// ```
pub struct TypedSubmap<'a, T> {
    store: &'a MetadataStore,
    _kind: PhantomData<fn() -> T>,
}

impl<'a, T: Storable> TypedSubmap<'a, T> {
    pub(crate) fn new(store: &'a MetadataStore) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// The same storage, seen with the nullable existence rule
    pub fn nullable(&self) -> NullableTypedSubmap<'a, T> {
        NullableTypedSubmap::new(self.store)
    }

    /// Binds `identifier` for repeated access through this view
    pub fn bind(&self, identifier: impl Into<String>) -> TypedBinding<Self> {
        TypedBinding::new(*self, identifier.into())
    }

    /// Applies a function to every non-null entry
    ///
    /// The entries are a snapshot taken before the first call, so `f` may
    /// freely use the store.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `f`.
    pub fn apply<F, E>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&str, &T) -> Result<(), E>,
    {
        for (identifier, value) in self.all_entries() {
            f(&identifier, &value)?;
        }
        Ok(())
    }

    /// Returns the number of non-null entries
    pub fn len(&self) -> usize {
        self.store
            .storage()
            .typed::<T>()
            .map_or(0, |submap| submap.values().count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the identifiers of all non-null entries
    pub fn keys(&self) -> Vec<String> {
        self.store.storage().typed::<T>().map_or_else(Vec::new, |submap| {
            submap.values().map(|(id, _)| id.to_owned()).collect()
        })
    }
}

impl<'a, T: Storable> MetadataAccess for TypedSubmap<'a, T> {
    type Value = T;

    fn name(&self) -> String {
        format!("{} {}", self.store.name(), T::KIND.plural())
    }

    fn get(&self, identifier: &str) -> Result<T, MetadataError> {
        self.get_or_null(identifier)
            .ok_or_else(|| MetadataError::typed(identifier, T::KIND, false))
    }

    fn get_or_null(&self, identifier: &str) -> Option<T> {
        self.store
            .storage()
            .typed::<T>()
            .and_then(|submap| submap.value(identifier))
            .cloned()
    }

    fn set(&self, identifier: &str, value: impl Into<Self::Value>) {
        self.store.install::<T>(identifier, Some(value.into()));
    }

    fn remove(&self, identifier: &str) -> Option<T> {
        self.store
            .take_value(T::KIND, identifier)
            .and_then(T::from_value)
    }

    fn exists(&self, identifier: &str) -> bool {
        self.store
            .storage()
            .typed::<T>()
            .is_some_and(|submap| submap.contains_value(identifier))
    }

    fn all_entries(&self) -> HashMap<String, T> {
        self.store.storage().typed::<T>().map_or_else(HashMap::new, |submap| {
            submap
                .values()
                .map(|(id, v)| (id.to_owned(), v.clone()))
                .collect()
        })
    }
}

/// A view of the same submap as [`TypedSubmap`], where a stored null counts as existing
///
/// `get` only fails when the identifier has no slot in this submap at all; a
/// null slot reads back as `Ok(None)`.
///
/// # Examples
///
/// ```
/// use sovran_metadata::{MetadataAccess, MetadataStore};
///
/// let store = MetadataStore::new("example");
/// let flags = store.booleans().nullable();
///
/// flags.set_null("verbose");
/// assert_eq!(flags.get("verbose")?, None);
/// assert!(flags.exists("verbose"));
/// assert!(!store.booleans().exists("verbose"));
///
/// flags.set("verbose", true);
/// assert_eq!(store.booleans().get("verbose")?, true);
/// # Ok::<(), sovran_metadata::MetadataError>(())
/// ```
pub struct NullableTypedSubmap<'a, T> {
    store: &'a MetadataStore,
    _kind: PhantomData<fn() -> T>,
}

impl<'a, T: Storable> NullableTypedSubmap<'a, T> {
    pub(crate) fn new(store: &'a MetadataStore) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// The strict view of the same storage
    pub fn strict(&self) -> TypedSubmap<'a, T> {
        TypedSubmap::new(self.store)
    }

    /// Stores a null, taking ownership of `identifier` for this submap
    pub fn set_null(&self, identifier: &str) {
        self.store.install::<T>(identifier, None);
    }

    pub fn bind(&self, identifier: impl Into<String>) -> TypedBinding<Self> {
        TypedBinding::new(*self, identifier.into())
    }

    /// Returns the number of slots, nulls included
    pub fn len(&self) -> usize {
        self.store
            .storage()
            .typed::<T>()
            .map_or(0, |submap| submap.slot_count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a, T: Storable> MetadataAccess for NullableTypedSubmap<'a, T> {
    type Value = Option<T>;

    fn name(&self) -> String {
        format!("{} nullable", self.strict().name())
    }

    fn get(&self, identifier: &str) -> Result<Option<T>, MetadataError> {
        self.get_or_null(identifier)
            .ok_or_else(|| MetadataError::typed(identifier, T::KIND, true))
    }

    fn get_or_null(&self, identifier: &str) -> Option<Option<T>> {
        self.store
            .storage()
            .typed::<T>()
            .and_then(|submap| submap.slot(identifier))
            .map(|slot| slot.cloned())
    }

    fn set(&self, identifier: &str, value: impl Into<Self::Value>) {
        self.store.install::<T>(identifier, value.into());
    }

    fn remove(&self, identifier: &str) -> Option<Option<T>> {
        self.store
            .take_slot(T::KIND, identifier)
            .map(|slot| slot.and_then(T::from_value))
    }

    fn exists(&self, identifier: &str) -> bool {
        self.store
            .storage()
            .typed::<T>()
            .is_some_and(|submap| submap.contains_slot(identifier))
    }

    fn all_entries(&self) -> HashMap<String, Option<T>> {
        self.store.storage().typed::<T>().map_or_else(HashMap::new, |submap| {
            submap
                .slots()
                .map(|(id, v)| (id.to_owned(), v.cloned()))
                .collect()
        })
    }
}

// Views are handles; copying one never requires `T: Copy`.
impl<T> Clone for TypedSubmap<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedSubmap<'_, T> {}

impl<T> Clone for NullableTypedSubmap<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NullableTypedSubmap<'_, T> {}

impl<T: Storable> fmt::Debug for TypedSubmap<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSubmap")
            .field("name", &self.name())
            .field("kind", &T::KIND)
            .finish()
    }
}

impl<T: Storable> fmt::Debug for NullableTypedSubmap<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableTypedSubmap")
            .field("name", &self.name())
            .field("kind", &T::KIND)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::Kind;

    #[test]
    fn test_names() {
        let store = MetadataStore::new("cfg");
        assert_eq!(store.ints().name(), "cfg ints");
        assert_eq!(store.strings().nullable().name(), "cfg strings nullable");
    }

    #[test]
    fn test_typed_error_carries_kind() {
        let store = MetadataStore::new("cfg");
        store.set("k", "text");

        let err = store.doubles().get("k").unwrap_err();
        assert_eq!(err.kind(), Some(Kind::Double));
        assert!(!err.is_nullable());

        let err = store.doubles().nullable().get("k").unwrap_err();
        assert_eq!(err.kind(), Some(Kind::Double));
        assert!(err.is_nullable());
    }

    #[test]
    fn test_apply_stops_on_error() {
        let store = MetadataStore::new("cfg");
        store.ints().set("a", 1i32);
        store.ints().set("b", 2i32);

        let mut seen = 0;
        let result = store.ints().apply(|_, _| {
            seen += 1;
            Err("stop")
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_nullable_len_counts_nulls() {
        let store = MetadataStore::new("cfg");
        store.chars().set("a", 'a');
        store.chars().nullable().set_null("b");
        assert_eq!(store.chars().len(), 1);
        assert_eq!(store.chars().nullable().len(), 2);
        assert_eq!(store.chars().keys(), vec!["a".to_string()]);
    }
}
